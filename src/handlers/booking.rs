use super::{admin_user, current_user};
use crate::models::*;
use crate::services::BookingService;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError, Result};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/bookings",
    tag = "booking",
    security(("bearer_auth" = [])),
    request_body = CreateBookingRequest,
    responses(
        (status = 200, description = "Booking created", body = CreateBookingResponse),
        (status = 400, description = "Invalid window or unusable discount card"),
        (status = 409, description = "Slot already taken or blocked")
    )
)]
/// Books a slot. Conflict checks, pricing and optional card redemption all
/// run in one transaction, so a failure leaves nothing behind.
pub async fn create_booking(
    service: web::Data<BookingService>,
    req: HttpRequest,
    body: web::Json<CreateBookingRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(u) => u,
        Err(e) => return Ok(e.error_response()),
    };
    match service.create_booking(&user, body.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/bookings/{id}/cancel",
    tag = "booking",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking cancelled", body = BookingResponse),
        (status = 400, description = "Not in booked state"),
        (status = 403, description = "Not the booking owner")
    )
)]
/// Cancelling never touches loyalty counts.
pub async fn cancel_booking(
    service: web::Data<BookingService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(u) => u,
        Err(e) => return Ok(e.error_response()),
    };
    match service.cancel_booking(&user, path.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/bookings/{id}/complete",
    tag = "booking",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking completed, loyalty updated", body = CompleteBookingResponse),
        (status = 400, description = "Not in booked state"),
        (status = 403, description = "Caller does not manage this venue")
    )
)]
/// Marks the booking completed and runs the loyalty accrual in the same
/// transaction. Every fifth completion per venue mints a discount card.
pub async fn complete_booking(
    service: web::Data<BookingService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(u) => u,
        Err(e) => return Ok(e.error_response()),
    };
    match service.complete_booking(&user, path.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/bookings/my",
    tag = "booking",
    security(("bearer_auth" = [])),
    params(
        ("page" = Option<u32>, Query, description = "Page number (default 1)"),
        ("per_page" = Option<u32>, Query, description = "Page size (default 20)"),
        ("status" = Option<String>, Query, description = "Filter: booked / completed / cancelled")
    ),
    responses(
        (status = 200, description = "Caller's bookings", body = PaginatedBookingResponse)
    )
)]
pub async fn my_bookings(
    service: web::Data<BookingService>,
    req: HttpRequest,
    query: web::Query<BookingQuery>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(u) => u,
        Err(e) => return Ok(e.error_response()),
    };
    match service.get_user_bookings(user.id, &query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": page }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/bookings/venue/{venue_id}",
    tag = "booking",
    security(("bearer_auth" = [])),
    params(
        ("venue_id" = i64, Path, description = "Venue id"),
        ("page" = Option<u32>, Query, description = "Page number (default 1)"),
        ("per_page" = Option<u32>, Query, description = "Page size (default 20)"),
        ("status" = Option<String>, Query, description = "Filter: booked / completed / cancelled")
    ),
    responses(
        (status = 200, description = "Bookings at the venue", body = PaginatedBookingResponse),
        (status = 403, description = "Caller does not manage this venue")
    )
)]
pub async fn venue_bookings(
    service: web::Data<BookingService>,
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<BookingQuery>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(u) => u,
        Err(e) => return Ok(e.error_response()),
    };
    match service
        .get_venue_bookings(&user, path.into_inner(), &query.into_inner())
        .await
    {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": page }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/bookings/admin/all",
    tag = "booking",
    security(("bearer_auth" = [])),
    params(
        ("page" = Option<u32>, Query, description = "Page number (default 1)"),
        ("per_page" = Option<u32>, Query, description = "Page size (default 20)"),
        ("status" = Option<String>, Query, description = "Filter: booked / completed / cancelled")
    ),
    responses(
        (status = 200, description = "All bookings", body = PaginatedBookingResponse),
        (status = 403, description = "Admin only")
    )
)]
pub async fn all_bookings(
    service: web::Data<BookingService>,
    req: HttpRequest,
    query: web::Query<BookingQuery>,
) -> Result<HttpResponse> {
    if let Err(e) = admin_user(&req) {
        return Ok(e.error_response());
    }
    match service.get_all_bookings(&query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": page }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/bookings/admin/auto-complete",
    tag = "booking",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Sweep finished", body = AutoCompleteSummary),
        (status = 403, description = "Admin only")
    )
)]
/// Completes every booked row whose slot has passed, running loyalty per
/// row. Safe to run repeatedly; the second sweep finds nothing.
pub async fn auto_complete(
    service: web::Data<BookingService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = admin_user(&req) {
        return Ok(e.error_response());
    }
    match service.auto_complete_past_due().await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/bookings/admin/{id}",
    tag = "booking",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking deleted"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn delete_booking(
    service: web::Data<BookingService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    if let Err(e) = admin_user(&req) {
        return Ok(e.error_response());
    }
    match service.delete_booking(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": null }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn booking_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/bookings")
            .route("", web::post().to(create_booking))
            .route("/my", web::get().to(my_bookings))
            .route("/venue/{venue_id}", web::get().to(venue_bookings))
            .route("/admin/all", web::get().to(all_bookings))
            .route("/admin/auto-complete", web::post().to(auto_complete))
            .route("/admin/{id}", web::delete().to(delete_booking))
            .route("/{id}/cancel", web::put().to(cancel_booking))
            .route("/{id}/complete", web::put().to(complete_booking)),
    );
}
