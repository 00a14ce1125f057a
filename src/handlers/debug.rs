use super::admin_user;
use crate::services::DebugService;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError, Result};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/debug/status",
    tag = "debug",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Entity counts"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn status(service: web::Data<DebugService>, req: HttpRequest) -> Result<HttpResponse> {
    if let Err(e) = admin_user(&req) {
        return Ok(e.error_response());
    }
    match service.status().await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn debug_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/debug").route("/status", web::get().to(status)));
}
