use super::{admin_user, current_user};
use crate::models::*;
use crate::services::FacilityRequestService;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError, Result};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/facility-requests",
    tag = "facility_request",
    security(("bearer_auth" = [])),
    request_body = CreateFacilityRequestRequest,
    responses(
        (status = 200, description = "Invitation created", body = FacilityRequestResponse),
        (status = 403, description = "Admin only"),
        (status = 409, description = "User already has a pending invitation")
    )
)]
pub async fn create_request(
    service: web::Data<FacilityRequestService>,
    req: HttpRequest,
    body: web::Json<CreateFacilityRequestRequest>,
) -> Result<HttpResponse> {
    let admin = match admin_user(&req) {
        Ok(u) => u,
        Err(e) => return Ok(e.error_response()),
    };
    match service.create(&admin, body.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/facility-requests/my",
    tag = "facility_request",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Invitations addressed to the caller", body = [FacilityRequestResponse])
    )
)]
pub async fn my_requests(
    service: web::Data<FacilityRequestService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(u) => u,
        Err(e) => return Ok(e.error_response()),
    };
    match service.my_requests(user.id).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/facility-requests",
    tag = "facility_request",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All invitations", body = [FacilityRequestResponse]),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_requests(
    service: web::Data<FacilityRequestService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = admin_user(&req) {
        return Ok(e.error_response());
    }
    match service.list_all().await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/facility-requests/{id}/accept",
    tag = "facility_request",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Invitation id")),
    responses(
        (status = 200, description = "Accepted, role promoted", body = FacilityRequestResponse),
        (status = 400, description = "Already responded to"),
        (status = 403, description = "Not the invitee")
    )
)]
pub async fn accept_request(
    service: web::Data<FacilityRequestService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(u) => u,
        Err(e) => return Ok(e.error_response()),
    };
    match service.respond(&user, path.into_inner(), true).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/facility-requests/{id}/reject",
    tag = "facility_request",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Invitation id")),
    responses(
        (status = 200, description = "Rejected", body = FacilityRequestResponse),
        (status = 400, description = "Already responded to"),
        (status = 403, description = "Not the invitee")
    )
)]
pub async fn reject_request(
    service: web::Data<FacilityRequestService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(u) => u,
        Err(e) => return Ok(e.error_response()),
    };
    match service.respond(&user, path.into_inner(), false).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/facility-requests/{id}",
    tag = "facility_request",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Invitation id")),
    responses(
        (status = 200, description = "Invitation withdrawn"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "No pending invitation with this id")
    )
)]
pub async fn delete_request(
    service: web::Data<FacilityRequestService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    if let Err(e) = admin_user(&req) {
        return Ok(e.error_response());
    }
    match service.delete(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": null }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn facility_request_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/facility-requests")
            .route("", web::post().to(create_request))
            .route("", web::get().to(list_requests))
            .route("/my", web::get().to(my_requests))
            .route("/{id}/accept", web::put().to(accept_request))
            .route("/{id}/reject", web::put().to(reject_request))
            .route("/{id}", web::delete().to(delete_request)),
    );
}
