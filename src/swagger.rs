use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{BookingStatus, RequestStatus, UserRole};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::send_otp,
        handlers::auth::verify_otp,
        handlers::auth::refresh,
        handlers::auth::get_profile,
        handlers::auth::update_profile,
        handlers::auth::change_password,
        handlers::venue::list_venues,
        handlers::venue::random_venues,
        handlers::venue::my_venues,
        handlers::venue::get_venue,
        handlers::venue::create_venue,
        handlers::venue::update_venue,
        handlers::venue::delete_venue,
        handlers::facility::add_court,
        handlers::facility::update_court,
        handlers::facility::delete_court,
        handlers::facility::create_time_slot_block,
        handlers::facility::list_time_slot_blocks,
        handlers::facility::delete_time_slot_block,
        handlers::booking::create_booking,
        handlers::booking::cancel_booking,
        handlers::booking::complete_booking,
        handlers::booking::my_bookings,
        handlers::booking::venue_bookings,
        handlers::booking::all_bookings,
        handlers::booking::auto_complete,
        handlers::booking::delete_booking,
        handlers::loyalty::scratch_card,
        handlers::loyalty::venue_status,
        handlers::loyalty::my_status,
        handlers::loyalty::my_cards,
        handlers::loyalty::test_reward,
        handlers::facility_request::create_request,
        handlers::facility_request::my_requests,
        handlers::facility_request::list_requests,
        handlers::facility_request::accept_request,
        handlers::facility_request::reject_request,
        handlers::facility_request::delete_request,
        handlers::debug::status,
    ),
    components(
        schemas(
            UserRole,
            BookingStatus,
            RequestStatus,
            CardStatus,
            RegisterRequest,
            LoginRequest,
            UpdateProfileRequest,
            ChangePasswordRequest,
            SendOtpRequest,
            SendOtpResponse,
            VerifyOtpRequest,
            handlers::auth::RefreshTokenRequest,
            UserResponse,
            AuthResponse,
            CreateVenueRequest,
            UpdateVenueRequest,
            VenueResponse,
            VenueDetailResponse,
            CreateCourtRequest,
            UpdateCourtRequest,
            CourtResponse,
            CreateTimeSlotBlockRequest,
            TimeSlotBlockResponse,
            CreateBookingRequest,
            BookingResponse,
            DiscountApplied,
            CreateBookingResponse,
            CompleteBookingResponse,
            AutoCompleteSummary,
            DiscountCardResponse,
            LoyaltyUpdate,
            ScratchCardResponse,
            LoyaltyStatusResponse,
            CreateFacilityRequestRequest,
            FacilityRequestResponse,
            PaginationInfo,
            PaginatedVenueResponse,
            PaginatedBookingResponse,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login, tokens, profile"),
        (name = "venue", description = "Venue directory and management"),
        (name = "facility", description = "Courts and blocked time slots"),
        (name = "booking", description = "Booking lifecycle"),
        (name = "loyalty", description = "Loyalty counters and discount cards"),
        (name = "facility_request", description = "Facility manager invitations"),
        (name = "debug", description = "Operational diagnostics"),
    ),
    info(
        title = "QuickCourt Backend API",
        version = "1.0.0",
        description = "Sports venue booking REST API documentation",
    ),
    servers(
        (url = "/api", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
