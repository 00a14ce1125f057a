pub mod card_code;
pub mod jwt;
pub mod password;

pub use card_code::generate_card_code;
pub use jwt::*;
pub use password::*;
