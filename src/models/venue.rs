use crate::entities::{court_entity, time_slot_block_entity, venue_entity};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateVenueRequest {
    #[schema(example = "Smash Arena")]
    pub name: String,
    #[schema(example = "Koramangala, Bengaluru")]
    pub location: String,
    pub description: Option<String>,
    /// Rupees per hour.
    #[schema(example = 500)]
    pub hourly_rate: i64,
    /// HH:MM
    #[schema(example = "06:00")]
    pub open_time: String,
    #[schema(example = "22:00")]
    pub close_time: String,
    pub amenities: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateVenueRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub hourly_rate: Option<i64>,
    pub open_time: Option<String>,
    pub close_time: Option<String>,
    pub amenities: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VenueQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Case-insensitive substring match on name or location.
    pub search: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VenueResponse {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub location: String,
    pub description: Option<String>,
    pub hourly_rate: i64,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub amenities: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VenueDetailResponse {
    #[serde(flatten)]
    pub venue: VenueResponse,
    pub courts: Vec<CourtResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateCourtRequest {
    #[schema(example = "Court 1")]
    pub name: String,
    #[schema(example = "badminton")]
    pub sport_type: String,
    /// Overrides the venue hourly rate when set.
    pub hourly_rate: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateCourtRequest {
    pub name: Option<String>,
    pub sport_type: Option<String>,
    pub hourly_rate: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CourtResponse {
    pub id: i64,
    pub venue_id: i64,
    pub name: String,
    pub sport_type: String,
    pub hourly_rate: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateTimeSlotBlockRequest {
    pub court_name: Option<String>,
    /// YYYY-MM-DD
    #[schema(example = "2026-09-01")]
    pub date: String,
    #[schema(example = "10:00")]
    pub start_time: String,
    #[schema(example = "12:00")]
    pub end_time: String,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TimeSlotBlockResponse {
    pub id: i64,
    pub venue_id: i64,
    pub court_name: Option<String>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub reason: Option<String>,
}

impl From<venue_entity::Model> for VenueResponse {
    fn from(v: venue_entity::Model) -> Self {
        let amenities = v
            .amenities
            .as_deref()
            .and_then(|raw| serde_json::from_str::<Vec<String>>(raw).ok())
            .unwrap_or_default();
        Self {
            id: v.id,
            owner_id: v.owner_id,
            name: v.name,
            location: v.location,
            description: v.description,
            hourly_rate: v.hourly_rate,
            open_time: v.open_time,
            close_time: v.close_time,
            amenities,
            created_at: v.created_at.unwrap_or_else(Utc::now),
        }
    }
}

impl From<court_entity::Model> for CourtResponse {
    fn from(c: court_entity::Model) -> Self {
        Self {
            id: c.id,
            venue_id: c.venue_id,
            name: c.name,
            sport_type: c.sport_type,
            hourly_rate: c.hourly_rate,
        }
    }
}

impl From<time_slot_block_entity::Model> for TimeSlotBlockResponse {
    fn from(b: time_slot_block_entity::Model) -> Self {
        Self {
            id: b.id,
            venue_id: b.venue_id,
            court_name: b.court_name,
            date: b.date,
            start_time: b.start_time,
            end_time: b.end_time,
            reason: b.reason,
        }
    }
}
