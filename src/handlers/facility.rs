use super::current_user;
use crate::models::*;
use crate::services::VenueService;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError, Result};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/facility/venues/{id}/courts",
    tag = "facility",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Venue id")),
    request_body = CreateCourtRequest,
    responses(
        (status = 200, description = "Court added", body = CourtResponse),
        (status = 403, description = "Not the owner"),
        (status = 409, description = "Duplicate court name at this venue")
    )
)]
pub async fn add_court(
    service: web::Data<VenueService>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<CreateCourtRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(u) => u,
        Err(e) => return Ok(e.error_response()),
    };
    match service
        .add_court(&user, path.into_inner(), body.into_inner())
        .await
    {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/facility/courts/{id}",
    tag = "facility",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Court id")),
    request_body = UpdateCourtRequest,
    responses(
        (status = 200, description = "Court updated", body = CourtResponse),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Court not found")
    )
)]
pub async fn update_court(
    service: web::Data<VenueService>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<UpdateCourtRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(u) => u,
        Err(e) => return Ok(e.error_response()),
    };
    match service
        .update_court(&user, path.into_inner(), body.into_inner())
        .await
    {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/facility/courts/{id}",
    tag = "facility",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Court id")),
    responses(
        (status = 200, description = "Court deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Court not found")
    )
)]
pub async fn delete_court(
    service: web::Data<VenueService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(u) => u,
        Err(e) => return Ok(e.error_response()),
    };
    match service.delete_court(&user, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": null }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/facility/venues/{id}/time-slots",
    tag = "facility",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Venue id")),
    request_body = CreateTimeSlotBlockRequest,
    responses(
        (status = 200, description = "Slot blocked", body = TimeSlotBlockResponse),
        (status = 403, description = "Not the owner")
    )
)]
/// Blocks a window for maintenance or a private event; bookings that would
/// overlap it are rejected.
pub async fn create_time_slot_block(
    service: web::Data<VenueService>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<CreateTimeSlotBlockRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(u) => u,
        Err(e) => return Ok(e.error_response()),
    };
    match service
        .create_time_slot_block(&user, path.into_inner(), body.into_inner())
        .await
    {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/facility/venues/{id}/time-slots",
    tag = "facility",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Venue id")),
    responses(
        (status = 200, description = "Blocked slots for the venue", body = [TimeSlotBlockResponse]),
        (status = 403, description = "Not the owner")
    )
)]
pub async fn list_time_slot_blocks(
    service: web::Data<VenueService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(u) => u,
        Err(e) => return Ok(e.error_response()),
    };
    match service.list_time_slot_blocks(&user, path.into_inner()).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/facility/time-slots/{id}",
    tag = "facility",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Block id")),
    responses(
        (status = 200, description = "Block removed"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Block not found")
    )
)]
pub async fn delete_time_slot_block(
    service: web::Data<VenueService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(u) => u,
        Err(e) => return Ok(e.error_response()),
    };
    match service.delete_time_slot_block(&user, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": null }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn facility_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/facility")
            .route("/venues/{id}/courts", web::post().to(add_court))
            .route("/courts/{id}", web::put().to(update_court))
            .route("/courts/{id}", web::delete().to(delete_court))
            .route(
                "/venues/{id}/time-slots",
                web::post().to(create_time_slot_block),
            )
            .route(
                "/venues/{id}/time-slots",
                web::get().to(list_time_slot_blocks),
            )
            .route("/time-slots/{id}", web::delete().to(delete_time_slot_block)),
    );
}
