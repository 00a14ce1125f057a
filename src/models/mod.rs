pub mod booking;
pub mod common;
pub mod facility_request;
pub mod loyalty;
pub mod pagination;
pub mod user;
pub mod venue;

pub use booking::*;
pub use common::*;
pub use facility_request::*;
pub use loyalty::*;
pub use pagination::*;
pub use user::*;
pub use venue::*;
