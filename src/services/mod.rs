pub mod auth_service;
pub mod booking_service;
pub mod debug_service;
pub mod facility_request_service;
pub mod loyalty_service;
pub mod venue_service;

pub use auth_service::*;
pub use booking_service::*;
pub use debug_service::*;
pub use facility_request_service::*;
pub use loyalty_service::*;
pub use venue_service::*;
