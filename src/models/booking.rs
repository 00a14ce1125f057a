use crate::entities::{booking_entity, BookingStatus};
use crate::models::LoyaltyUpdate;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    pub venue_id: i64,
    pub court_name: Option<String>,
    /// YYYY-MM-DD
    #[schema(example = "2026-09-01")]
    pub date: String,
    /// HH:MM
    #[schema(example = "18:00")]
    pub start_time: String,
    #[schema(example = "20:00")]
    pub end_time: String,
    pub notes: Option<String>,
    /// A scratched, unused, unexpired card owned by the caller.
    pub discount_card_id: Option<i64>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct BookingQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<BookingStatus>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingResponse {
    pub id: i64,
    pub venue_id: i64,
    pub user_id: i64,
    pub court_name: Option<String>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: BookingStatus,
    pub original_amount: i64,
    pub discount_amount: i64,
    pub total_amount: i64,
    pub discount_card_id: Option<i64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Price breakdown returned when a discount card was applied.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DiscountApplied {
    pub original: i64,
    pub discount: i64,
    #[serde(rename = "final")]
    pub final_amount: i64,
    pub percentage: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateBookingResponse {
    pub booking: BookingResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_applied: Option<DiscountApplied>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CompleteBookingResponse {
    pub booking: BookingResponse,
    pub loyalty_update: LoyaltyUpdate,
}

/// Result of one auto-complete sweep over past-due bookings.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AutoCompleteSummary {
    pub completed_bookings: i64,
    pub rewards_earned: i64,
}

impl From<booking_entity::Model> for BookingResponse {
    fn from(b: booking_entity::Model) -> Self {
        Self {
            id: b.id,
            venue_id: b.venue_id,
            user_id: b.user_id,
            court_name: b.court_name,
            date: b.date,
            start_time: b.start_time,
            end_time: b.end_time,
            status: b.status,
            original_amount: b.original_amount,
            discount_amount: b.discount_amount,
            total_amount: b.total_amount,
            discount_card_id: b.discount_card_id,
            notes: b.notes,
            created_at: b.created_at.unwrap_or_else(Utc::now),
        }
    }
}
