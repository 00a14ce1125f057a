use super::{admin_user, current_user};
use crate::models::*;
use crate::services::LoyaltyService;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError, Result};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/loyalty/scratch/{card_id}",
    tag = "loyalty",
    security(("bearer_auth" = [])),
    params(("card_id" = i64, Path, description = "Discount card id")),
    responses(
        (status = 200, description = "Card revealed", body = ScratchCardResponse),
        (status = 400, description = "Already scratched, already used or expired"),
        (status = 404, description = "Card not found")
    )
)]
/// Reveals the discount percentage. A card can only be scratched once.
pub async fn scratch_card(
    service: web::Data<LoyaltyService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(u) => u,
        Err(e) => return Ok(e.error_response()),
    };
    match service.scratch_card(user.id, path.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/loyalty/status/{venue_id}",
    tag = "loyalty",
    security(("bearer_auth" = [])),
    params(("venue_id" = i64, Path, description = "Venue id")),
    responses(
        (status = 200, description = "Loyalty standing at the venue", body = LoyaltyStatusResponse)
    )
)]
pub async fn venue_status(
    service: web::Data<LoyaltyService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(u) => u,
        Err(e) => return Ok(e.error_response()),
    };
    match service.status(user.id, path.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/loyalty/my-status",
    tag = "loyalty",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Standing at every venue with a record", body = [LoyaltyStatusResponse])
    )
)]
pub async fn my_status(service: web::Data<LoyaltyService>, req: HttpRequest) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(u) => u,
        Err(e) => return Ok(e.error_response()),
    };
    match service.my_status(user.id).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/loyalty/cards",
    tag = "loyalty",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All the caller's cards, newest first", body = [DiscountCardResponse])
    )
)]
pub async fn my_cards(service: web::Data<LoyaltyService>, req: HttpRequest) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(u) => u,
        Err(e) => return Ok(e.error_response()),
    };
    match service.list_cards(user.id).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/loyalty/test-reward/{venue_id}",
    tag = "loyalty",
    security(("bearer_auth" = [])),
    params(("venue_id" = i64, Path, description = "Venue id")),
    responses(
        (status = 200, description = "Accrual tick applied", body = LoyaltyUpdate),
        (status = 403, description = "Admin only")
    )
)]
/// Forces one accrual tick on the caller's own record. Handy for checking
/// the milestone logic against a live deployment.
pub async fn test_reward(
    service: web::Data<LoyaltyService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = match admin_user(&req) {
        Ok(u) => u,
        Err(e) => return Ok(e.error_response()),
    };
    match service
        .record_completed_booking(user.id, path.into_inner())
        .await
    {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn loyalty_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/loyalty")
            .route("/scratch/{card_id}", web::post().to(scratch_card))
            .route("/status/{venue_id}", web::get().to(venue_status))
            .route("/my-status", web::get().to(my_status))
            .route("/cards", web::get().to(my_cards))
            .route("/test-reward/{venue_id}", web::post().to(test_reward)),
    );
}
