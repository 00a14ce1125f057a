use crate::entities::{discount_card_entity, CardState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Card status as reported to clients. Unlike the stored [`CardState`] this
/// includes `Expired`, which is derived from `expires_at` at read time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    Earned,
    Scratched,
    Used,
    Expired,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DiscountCardResponse {
    pub id: i64,
    pub venue_id: i64,
    pub card_code: String,
    /// Hidden (`null`) until the card has been scratched.
    pub discount_percentage: Option<i32>,
    pub status: CardStatus,
    pub earned_at: DateTime<Utc>,
    pub scratched_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
}

impl DiscountCardResponse {
    pub fn from_model(card: discount_card_entity::Model, now: DateTime<Utc>) -> Self {
        let status = if card.is_expired(now) {
            CardStatus::Expired
        } else {
            match card.state {
                CardState::Earned => CardStatus::Earned,
                CardState::Scratched => CardStatus::Scratched,
                CardState::Used => CardStatus::Used,
            }
        };
        // the percentage is the scratch-off surprise
        let discount_percentage = match card.state {
            CardState::Earned => None,
            CardState::Scratched | CardState::Used => Some(card.discount_percentage),
        };
        Self {
            id: card.id,
            venue_id: card.venue_id,
            card_code: card.card_code,
            discount_percentage,
            status,
            earned_at: card.earned_at,
            scratched_at: card.scratched_at,
            expires_at: card.expires_at,
        }
    }
}

/// Returned by booking completion so the client can show "reward earned".
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoyaltyUpdate {
    pub booking_count: i64,
    pub card_earned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<DiscountCardResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ScratchCardResponse {
    pub card_id: i64,
    pub card_code: String,
    pub discount_percentage: i32,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoyaltyStatusResponse {
    pub venue_id: i64,
    pub booking_count: i64,
    pub bookings_to_next_reward: i64,
    pub next_milestone: i64,
    pub available_cards: Vec<DiscountCardResponse>,
    pub scratched_cards: Vec<DiscountCardResponse>,
    pub used_cards: Vec<DiscountCardResponse>,
    pub expired_cards: Vec<DiscountCardResponse>,
}
