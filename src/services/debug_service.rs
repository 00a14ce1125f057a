use crate::entities::{
    booking_entity as bookings, court_entity as courts, discount_card_entity as cards,
    facility_manager_request_entity as requests, loyalty_record_entity as records,
    user_entity as users, venue_entity as venues, BookingStatus, CardState, RequestStatus,
};
use crate::error::AppResult;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::{json, Value};

/// Entity counts for the admin diagnostics endpoint.
#[derive(Clone)]
pub struct DebugService {
    pool: DatabaseConnection,
}

impl DebugService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn status(&self) -> AppResult<Value> {
        let users_count = users::Entity::find().count(&self.pool).await?;
        let venues_count = venues::Entity::find().count(&self.pool).await?;
        let courts_count = courts::Entity::find().count(&self.pool).await?;

        let booked = self.booking_count(BookingStatus::Booked).await?;
        let completed = self.booking_count(BookingStatus::Completed).await?;
        let cancelled = self.booking_count(BookingStatus::Cancelled).await?;

        let records_count = records::Entity::find().count(&self.pool).await?;
        let earned = self.card_count(CardState::Earned).await?;
        let scratched = self.card_count(CardState::Scratched).await?;
        let used = self.card_count(CardState::Used).await?;

        let pending_requests = requests::Entity::find()
            .filter(requests::Column::Status.eq(RequestStatus::Pending))
            .count(&self.pool)
            .await?;

        Ok(json!({
            "users": users_count,
            "venues": venues_count,
            "courts": courts_count,
            "bookings": {
                "booked": booked,
                "completed": completed,
                "cancelled": cancelled,
            },
            "loyalty_records": records_count,
            "discount_cards": {
                "earned": earned,
                "scratched": scratched,
                "used": used,
            },
            "pending_facility_requests": pending_requests,
        }))
    }

    async fn booking_count(&self, status: BookingStatus) -> AppResult<u64> {
        Ok(bookings::Entity::find()
            .filter(bookings::Column::Status.eq(status))
            .count(&self.pool)
            .await?)
    }

    async fn card_count(&self, state: CardState) -> AppResult<u64> {
        Ok(cards::Entity::find()
            .filter(cards::Column::State.eq(state))
            .count(&self.pool)
            .await?)
    }
}
