pub mod bookings;
pub mod courts;
pub mod discount_cards;
pub mod facility_manager_requests;
pub mod loyalty_records;
pub mod time_slot_blocks;
pub mod users;
pub mod venues;

pub use bookings as booking_entity;
pub use courts as court_entity;
pub use discount_cards as discount_card_entity;
pub use facility_manager_requests as facility_manager_request_entity;
pub use loyalty_records as loyalty_record_entity;
pub use time_slot_blocks as time_slot_block_entity;
pub use users as user_entity;
pub use venues as venue_entity;

pub use bookings::BookingStatus;
pub use discount_cards::CardState;
pub use facility_manager_requests::RequestStatus;
pub use users::UserRole;
