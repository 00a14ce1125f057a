use crate::error::AppError;
use crate::models::CurrentUser;
use actix_web::{HttpMessage, HttpRequest};

pub mod auth;
pub mod booking;
pub mod debug;
pub mod facility;
pub mod facility_request;
pub mod loyalty;
pub mod venue;

pub use auth::auth_config;
pub use booking::booking_config;
pub use debug::debug_config;
pub use facility::facility_config;
pub use facility_request::facility_request_config;
pub use loyalty::loyalty_config;
pub use venue::venue_config;

/// Identity the auth middleware stored in request extensions.
pub(crate) fn current_user(req: &HttpRequest) -> Result<CurrentUser, AppError> {
    req.extensions()
        .get::<CurrentUser>()
        .copied()
        .ok_or_else(|| AppError::AuthError("Not authenticated".to_string()))
}

/// Same as [`current_user`] but additionally requires the admin role.
pub(crate) fn admin_user(req: &HttpRequest) -> Result<CurrentUser, AppError> {
    let user = current_user(req)?;
    if !user.is_admin() {
        return Err(AppError::PermissionDenied);
    }
    Ok(user)
}
