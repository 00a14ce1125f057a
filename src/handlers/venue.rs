use super::current_user;
use crate::models::*;
use crate::services::VenueService;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError, Result};
use serde_json::json;

const RANDOM_SAMPLE_SIZE: usize = 6;

#[utoipa::path(
    get,
    path = "/venues",
    tag = "venue",
    params(
        ("page" = Option<u32>, Query, description = "Page number (default 1)"),
        ("per_page" = Option<u32>, Query, description = "Page size (default 20)"),
        ("search" = Option<String>, Query, description = "Substring match on name or location")
    ),
    responses(
        (status = 200, description = "Paginated venue listing", body = PaginatedVenueResponse)
    )
)]
/// Public listing, no auth required.
pub async fn list_venues(
    service: web::Data<VenueService>,
    query: web::Query<VenueQuery>,
) -> Result<HttpResponse> {
    match service.list_venues(&query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": page }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/venues/random",
    tag = "venue",
    responses(
        (status = 200, description = "Random venue sample", body = [VenueResponse])
    )
)]
pub async fn random_venues(service: web::Data<VenueService>) -> Result<HttpResponse> {
    match service.random_venues(RANDOM_SAMPLE_SIZE).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/venues/my-venues",
    tag = "venue",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Venues owned by the caller", body = [VenueResponse]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_venues(service: web::Data<VenueService>, req: HttpRequest) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(u) => u,
        Err(e) => return Ok(e.error_response()),
    };
    match service.my_venues(&user).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/venues/{id}",
    tag = "venue",
    params(("id" = i64, Path, description = "Venue id")),
    responses(
        (status = 200, description = "Venue detail with courts", body = VenueDetailResponse),
        (status = 404, description = "Venue not found")
    )
)]
pub async fn get_venue(
    service: web::Data<VenueService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.get_venue(path.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/venues",
    tag = "venue",
    security(("bearer_auth" = [])),
    request_body = CreateVenueRequest,
    responses(
        (status = 200, description = "Venue created", body = VenueResponse),
        (status = 403, description = "Caller is not a facility manager or admin"),
        (status = 409, description = "Duplicate name at this location")
    )
)]
pub async fn create_venue(
    service: web::Data<VenueService>,
    req: HttpRequest,
    body: web::Json<CreateVenueRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(u) => u,
        Err(e) => return Ok(e.error_response()),
    };
    match service.create_venue(&user, body.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/venues/{id}",
    tag = "venue",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Venue id")),
    request_body = UpdateVenueRequest,
    responses(
        (status = 200, description = "Venue updated", body = VenueResponse),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Venue not found")
    )
)]
pub async fn update_venue(
    service: web::Data<VenueService>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<UpdateVenueRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(u) => u,
        Err(e) => return Ok(e.error_response()),
    };
    match service
        .update_venue(&user, path.into_inner(), body.into_inner())
        .await
    {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/venues/{id}",
    tag = "venue",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Venue id")),
    responses(
        (status = 200, description = "Venue deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Venue not found")
    )
)]
pub async fn delete_venue(
    service: web::Data<VenueService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(u) => u,
        Err(e) => return Ok(e.error_response()),
    };
    match service.delete_venue(&user, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": null }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn venue_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/venues")
            .route("", web::get().to(list_venues))
            .route("", web::post().to(create_venue))
            .route("/random", web::get().to(random_venues))
            .route("/my-venues", web::get().to(my_venues))
            .route("/{id}", web::get().to(get_venue))
            .route("/{id}", web::put().to(update_venue))
            .route("/{id}", web::delete().to(delete_venue)),
    );
}
