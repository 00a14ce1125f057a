use chrono::{NaiveDate, NaiveTime, Utc};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};

use quickcourt_backend::config::LoyaltyConfig;
use quickcourt_backend::database::run_migrations;
use quickcourt_backend::entities::{
    booking_entity as bookings, court_entity as courts, discount_card_entity as cards,
    user_entity as users, venue_entity as venues, BookingStatus, CardState, UserRole,
};
use quickcourt_backend::models::CurrentUser;
use quickcourt_backend::services::{BookingService, LoyaltyService};

pub async fn setup_test_db() -> DatabaseConnection {
    // One pooled connection so every handle sees the same in-memory database.
    let mut opts = ConnectOptions::new("sqlite::memory:".to_owned());
    opts.max_connections(1).sqlx_logging(false);

    let pool = Database::connect(opts)
        .await
        .expect("Failed to connect to test database");
    run_migrations(&pool).await.expect("Failed to run migrations");
    pool
}

#[allow(dead_code)]
pub fn loyalty_service(pool: &DatabaseConnection) -> LoyaltyService {
    LoyaltyService::new(pool.clone(), LoyaltyConfig::default())
}

/// Single 45% tier so discount assertions are deterministic.
#[allow(dead_code)]
pub fn loyalty_service_fixed_tier(pool: &DatabaseConnection) -> LoyaltyService {
    let config = LoyaltyConfig {
        discount_tiers: vec![45],
        ..LoyaltyConfig::default()
    };
    LoyaltyService::new(pool.clone(), config)
}

#[allow(dead_code)]
pub fn booking_service(pool: &DatabaseConnection) -> BookingService {
    BookingService::new(pool.clone(), loyalty_service(pool))
}

#[allow(dead_code)]
pub fn booking_service_fixed_tier(pool: &DatabaseConnection) -> BookingService {
    BookingService::new(pool.clone(), loyalty_service_fixed_tier(pool))
}

#[allow(dead_code)]
pub async fn create_test_user(
    pool: &DatabaseConnection,
    email: &str,
    role: UserRole,
) -> users::Model {
    users::ActiveModel {
        email: Set(email.to_string()),
        password_hash: Set("$2b$12$dummy.hash.for.testing".to_string()),
        full_name: Set("Test User".to_string()),
        phone: Set(None),
        role: Set(role),
        ..Default::default()
    }
    .insert(pool)
    .await
    .expect("Failed to create test user")
}

#[allow(dead_code)]
pub fn current(user: &users::Model) -> CurrentUser {
    CurrentUser {
        id: user.id,
        role: user.role,
    }
}

/// Venue at 500/hr, open 06:00 to 22:00.
#[allow(dead_code)]
pub async fn create_test_venue(
    pool: &DatabaseConnection,
    owner_id: i64,
    name: &str,
) -> venues::Model {
    venues::ActiveModel {
        owner_id: Set(owner_id),
        name: Set(name.to_string()),
        location: Set("Test City".to_string()),
        description: Set(None),
        hourly_rate: Set(500),
        open_time: Set(time(6, 0)),
        close_time: Set(time(22, 0)),
        amenities: Set(None),
        ..Default::default()
    }
    .insert(pool)
    .await
    .expect("Failed to create test venue")
}

#[allow(dead_code)]
pub async fn create_test_court(
    pool: &DatabaseConnection,
    venue_id: i64,
    name: &str,
    hourly_rate: Option<i64>,
) -> courts::Model {
    courts::ActiveModel {
        venue_id: Set(venue_id),
        name: Set(name.to_string()),
        sport_type: Set("badminton".to_string()),
        hourly_rate: Set(hourly_rate),
        ..Default::default()
    }
    .insert(pool)
    .await
    .expect("Failed to create test court")
}

/// Inserts a booking row directly, bypassing the service validation. Used to
/// seed past-due bookings the create path would rightly refuse.
#[allow(dead_code)]
pub async fn insert_booking(
    pool: &DatabaseConnection,
    user_id: i64,
    venue_id: i64,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    status: BookingStatus,
) -> bookings::Model {
    bookings::ActiveModel {
        venue_id: Set(venue_id),
        user_id: Set(user_id),
        court_name: Set(None),
        date: Set(date),
        start_time: Set(start),
        end_time: Set(end),
        status: Set(status),
        original_amount: Set(1000),
        discount_amount: Set(0),
        total_amount: Set(1000),
        discount_card_id: Set(None),
        notes: Set(None),
        ..Default::default()
    }
    .insert(pool)
    .await
    .expect("Failed to insert test booking")
}

/// Inserts a card in a chosen state with a chosen expiry offset (days).
#[allow(dead_code)]
pub async fn insert_card(
    pool: &DatabaseConnection,
    user_id: i64,
    venue_id: i64,
    state: CardState,
    expires_in_days: i64,
) -> cards::Model {
    let now = Utc::now();
    cards::ActiveModel {
        user_id: Set(user_id),
        venue_id: Set(venue_id),
        card_code: Set(format!("QC-TEST{:04}", rand_suffix())),
        discount_percentage: Set(45),
        state: Set(state),
        earned_at: Set(now),
        scratched_at: Set(match state {
            CardState::Earned => None,
            _ => Some(now),
        }),
        used_at: Set(None),
        expires_at: Set(now + chrono::Duration::days(expires_in_days)),
        booking_id: Set(None),
        ..Default::default()
    }
    .insert(pool)
    .await
    .expect("Failed to insert test card")
}

#[allow(dead_code)]
fn rand_suffix() -> u32 {
    use rand::Rng;
    rand::thread_rng().gen_range(0..10_000)
}

#[allow(dead_code)]
pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
}

#[allow(dead_code)]
pub fn tomorrow() -> NaiveDate {
    Utc::now().date_naive() + chrono::Duration::days(1)
}

#[allow(dead_code)]
pub fn yesterday() -> NaiveDate {
    Utc::now().date_naive() - chrono::Duration::days(1)
}

#[allow(dead_code)]
pub fn date_string(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
