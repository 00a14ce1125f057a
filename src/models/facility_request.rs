use crate::entities::{facility_manager_request_entity, RequestStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateFacilityRequestRequest {
    /// Email of the user being invited.
    #[schema(example = "priya@example.com")]
    pub email: String,
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FacilityRequestResponse {
    pub id: i64,
    pub user_id: i64,
    pub invited_by: i64,
    pub status: RequestStatus,
    pub message: Option<String>,
    pub responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<facility_manager_request_entity::Model> for FacilityRequestResponse {
    fn from(r: facility_manager_request_entity::Model) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            invited_by: r.invited_by,
            status: r.status,
            message: r.message,
            responded_at: r.responded_at,
            created_at: r.created_at.unwrap_or_else(Utc::now),
        }
    }
}
