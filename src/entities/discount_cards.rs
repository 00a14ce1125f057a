use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Stored card state. Only two write transitions exist:
///
/// ```text
/// earned --scratch--> scratched --redeem--> used   [terminal]
/// ```
///
/// Expiry is never written; it is derived from `expires_at` at read time,
/// so an expired card simply fails the guards on both transitions.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[serde(rename_all = "snake_case")]
pub enum CardState {
    #[sea_orm(string_value = "earned")]
    Earned,
    #[sea_orm(string_value = "scratched")]
    Scratched,
    #[sea_orm(string_value = "used")]
    Used,
}

impl std::fmt::Display for CardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardState::Earned => write!(f, "earned"),
            CardState::Scratched => write!(f, "scratched"),
            CardState::Used => write!(f, "used"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "discount_cards")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub venue_id: i64,
    pub card_code: String,
    /// Hidden until the card is scratched.
    pub discount_percentage: i32,
    pub state: CardState,
    pub earned_at: DateTime<Utc>,
    pub scratched_at: Option<DateTime<Utc>>,
    pub used_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    /// The booking that consumed this card, once used.
    pub booking_id: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.state != CardState::Used && now > self.expires_at
    }

    pub fn can_scratch(&self, now: DateTime<Utc>) -> bool {
        self.state == CardState::Earned && !self.is_expired(now)
    }

    pub fn can_redeem(&self, now: DateTime<Utc>) -> bool {
        self.state == CardState::Scratched && !self.is_expired(now)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn card(state: CardState, expires_in: Duration) -> Model {
        let now = Utc::now();
        Model {
            id: 1,
            user_id: 1,
            venue_id: 1,
            card_code: "QC12345678".to_string(),
            discount_percentage: 45,
            state,
            earned_at: now,
            scratched_at: None,
            used_at: None,
            expires_at: now + expires_in,
            booking_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn earned_card_can_scratch_but_not_redeem() {
        let c = card(CardState::Earned, Duration::days(30));
        let now = Utc::now();
        assert!(c.can_scratch(now));
        assert!(!c.can_redeem(now));
    }

    #[test]
    fn scratched_card_can_redeem_but_not_rescratch() {
        let c = card(CardState::Scratched, Duration::days(30));
        let now = Utc::now();
        assert!(!c.can_scratch(now));
        assert!(c.can_redeem(now));
    }

    #[test]
    fn used_card_is_terminal() {
        let c = card(CardState::Used, Duration::days(30));
        let now = Utc::now();
        assert!(!c.can_scratch(now));
        assert!(!c.can_redeem(now));
        // used cards are settled; expiry no longer applies
        assert!(!c.is_expired(now + Duration::days(365)));
    }

    #[test]
    fn expired_card_rejects_both_transitions() {
        let now = Utc::now();
        let earned = card(CardState::Earned, Duration::days(-1));
        let scratched = card(CardState::Scratched, Duration::days(-1));
        assert!(earned.is_expired(now));
        assert!(!earned.can_scratch(now));
        assert!(!scratched.can_redeem(now));
    }
}
