use crate::config::LoyaltyConfig;
use crate::entities::{
    discount_card_entity as cards, loyalty_record_entity as records, CardState,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    DiscountCardResponse, LoyaltyStatusResponse, LoyaltyUpdate, ScratchCardResponse,
};
use crate::utils::generate_card_code;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

/// Tracks completed bookings per user+venue and mints a scratch-off discount
/// card at every milestone. Scratch and redeem are both guarded conditional
/// updates so a card can never be revealed or spent twice, even across
/// concurrent requests.
#[derive(Clone)]
pub struct LoyaltyService {
    pool: DatabaseConnection,
    config: LoyaltyConfig,
}

/// True when `count` sits exactly on a reward milestone.
fn is_milestone(count: i64, interval: i64) -> bool {
    interval > 0 && count > 0 && count % interval == 0
}

/// Uniform draw from the configured tier set.
fn pick_discount_tier(tiers: &[i32]) -> Option<i32> {
    if tiers.is_empty() {
        return None;
    }
    let mut rng = rand::thread_rng();
    Some(tiers[rng.gen_range(0..tiers.len())])
}

impl LoyaltyService {
    pub fn new(pool: DatabaseConnection, config: LoyaltyConfig) -> Self {
        Self { pool, config }
    }

    /// One accrual tick for (user, venue). Call inside the transaction that
    /// completes the booking so the counter and the booking status move
    /// together.
    pub async fn record_completed_booking_tx<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i64,
        venue_id: i64,
    ) -> AppResult<LoyaltyUpdate> {
        self.ensure_record(conn, user_id, venue_id).await?;

        // Increment in SQL rather than read-modify-write so concurrent
        // completions never lose a count.
        records::Entity::update_many()
            .col_expr(
                records::Column::BookingCount,
                Expr::col(records::Column::BookingCount).add(1),
            )
            .col_expr(records::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(records::Column::UserId.eq(user_id))
            .filter(records::Column::VenueId.eq(venue_id))
            .exec(conn)
            .await?;

        let record = records::Entity::find()
            .filter(records::Column::UserId.eq(user_id))
            .filter(records::Column::VenueId.eq(venue_id))
            .one(conn)
            .await?
            .ok_or_else(|| {
                AppError::InternalError("Loyalty record disappeared after increment".to_string())
            })?;

        let now = Utc::now();
        if !is_milestone(record.booking_count, self.config.milestone_interval) {
            return Ok(LoyaltyUpdate {
                booking_count: record.booking_count,
                card_earned: false,
                card: None,
            });
        }

        let card = self.mint_card(conn, user_id, venue_id, now).await?;
        log::info!(
            "Minted discount card {} for user {user_id} at venue {venue_id} (booking #{})",
            card.card_code,
            record.booking_count
        );

        Ok(LoyaltyUpdate {
            booking_count: record.booking_count,
            card_earned: true,
            card: Some(DiscountCardResponse::from_model(card, now)),
        })
    }

    /// Standalone accrual tick (admin test-reward endpoint).
    pub async fn record_completed_booking(
        &self,
        user_id: i64,
        venue_id: i64,
    ) -> AppResult<LoyaltyUpdate> {
        let txn = self.pool.begin().await?;
        let update = self
            .record_completed_booking_tx(&txn, user_id, venue_id)
            .await?;
        txn.commit().await?;
        Ok(update)
    }

    /// Reveals the card percentage, at most once. The guarded update only
    /// matches an unexpired card still in `earned`; zero rows affected means
    /// the transition is not allowed and we report why.
    pub async fn scratch_card(&self, user_id: i64, card_id: i64) -> AppResult<ScratchCardResponse> {
        let now = Utc::now();

        let res = cards::Entity::update_many()
            .col_expr(cards::Column::State, Expr::value(CardState::Scratched))
            .col_expr(cards::Column::ScratchedAt, Expr::value(Some(now)))
            .col_expr(cards::Column::UpdatedAt, Expr::value(now))
            .filter(cards::Column::Id.eq(card_id))
            .filter(cards::Column::UserId.eq(user_id))
            .filter(cards::Column::State.eq(CardState::Earned))
            .filter(cards::Column::ExpiresAt.gte(now))
            .exec(&self.pool)
            .await?;

        if res.rows_affected == 0 {
            return Err(self.explain_card_failure(user_id, card_id, now).await);
        }

        let card = cards::Entity::find_by_id(card_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Discount card not found".to_string()))?;

        Ok(ScratchCardResponse {
            card_id: card.id,
            card_code: card.card_code,
            discount_percentage: card.discount_percentage,
            expires_at: card.expires_at,
        })
    }

    /// Loads a card for redemption inside booking creation, rejecting
    /// anything that is not the caller's scratched, unused, unexpired card
    /// for this venue. The actual spend happens in [`mark_card_used_tx`].
    pub async fn load_redeemable_card_tx<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i64,
        venue_id: i64,
        card_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<cards::Model> {
        let card = cards::Entity::find_by_id(card_id)
            .one(conn)
            .await?
            .filter(|c| c.user_id == user_id)
            .ok_or_else(|| AppError::NotFound("Discount card not found".to_string()))?;

        if card.venue_id != venue_id {
            return Err(AppError::ValidationError(
                "Discount card is not valid at this venue".to_string(),
            ));
        }
        if card.state == CardState::Used {
            return Err(AppError::ValidationError(
                "Discount card has already been used".to_string(),
            ));
        }
        if card.is_expired(now) {
            return Err(AppError::ValidationError(
                "Discount card has expired".to_string(),
            ));
        }
        if card.state == CardState::Earned {
            return Err(AppError::ValidationError(
                "Discount card must be scratched before it can be used".to_string(),
            ));
        }

        Ok(card)
    }

    /// Spends the card: guarded `scratched -> used`. Zero rows affected means
    /// another request consumed it between load and spend.
    pub async fn mark_card_used_tx<C: ConnectionTrait>(
        &self,
        conn: &C,
        card_id: i64,
        booking_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let res = cards::Entity::update_many()
            .col_expr(cards::Column::State, Expr::value(CardState::Used))
            .col_expr(cards::Column::UsedAt, Expr::value(Some(now)))
            .col_expr(cards::Column::BookingId, Expr::value(Some(booking_id)))
            .col_expr(cards::Column::UpdatedAt, Expr::value(now))
            .filter(cards::Column::Id.eq(card_id))
            .filter(cards::Column::State.eq(CardState::Scratched))
            .filter(cards::Column::ExpiresAt.gte(now))
            .exec(conn)
            .await?;

        if res.rows_affected == 0 {
            return Err(AppError::Conflict(
                "Discount card is no longer available".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn status(&self, user_id: i64, venue_id: i64) -> AppResult<LoyaltyStatusResponse> {
        let record = records::Entity::find()
            .filter(records::Column::UserId.eq(user_id))
            .filter(records::Column::VenueId.eq(venue_id))
            .one(&self.pool)
            .await?;
        let booking_count = record.map(|r| r.booking_count).unwrap_or(0);

        let venue_cards = cards::Entity::find()
            .filter(cards::Column::UserId.eq(user_id))
            .filter(cards::Column::VenueId.eq(venue_id))
            .order_by_desc(cards::Column::EarnedAt)
            .all(&self.pool)
            .await?;

        Ok(self.build_status(venue_id, booking_count, venue_cards))
    }

    /// Status for every venue the user has loyalty history with.
    pub async fn my_status(&self, user_id: i64) -> AppResult<Vec<LoyaltyStatusResponse>> {
        let user_records = records::Entity::find()
            .filter(records::Column::UserId.eq(user_id))
            .order_by_desc(records::Column::UpdatedAt)
            .all(&self.pool)
            .await?;

        let all_cards = cards::Entity::find()
            .filter(cards::Column::UserId.eq(user_id))
            .order_by_desc(cards::Column::EarnedAt)
            .all(&self.pool)
            .await?;

        let statuses = user_records
            .into_iter()
            .map(|r| {
                let venue_cards: Vec<cards::Model> = all_cards
                    .iter()
                    .filter(|c| c.venue_id == r.venue_id)
                    .cloned()
                    .collect();
                self.build_status(r.venue_id, r.booking_count, venue_cards)
            })
            .collect();

        Ok(statuses)
    }

    pub async fn list_cards(&self, user_id: i64) -> AppResult<Vec<DiscountCardResponse>> {
        let now = Utc::now();
        let all = cards::Entity::find()
            .filter(cards::Column::UserId.eq(user_id))
            .order_by_desc(cards::Column::EarnedAt)
            .all(&self.pool)
            .await?;
        Ok(all
            .into_iter()
            .map(|c| DiscountCardResponse::from_model(c, now))
            .collect())
    }

    // -----------------------------
    // internal helpers
    // -----------------------------

    fn build_status(
        &self,
        venue_id: i64,
        booking_count: i64,
        venue_cards: Vec<cards::Model>,
    ) -> LoyaltyStatusResponse {
        let now = Utc::now();
        let interval = self.config.milestone_interval;
        let bookings_to_next_reward = interval - booking_count % interval;
        let next_milestone = booking_count + bookings_to_next_reward;

        let mut available_cards = Vec::new();
        let mut scratched_cards = Vec::new();
        let mut used_cards = Vec::new();
        let mut expired_cards = Vec::new();
        for card in venue_cards {
            let expired = card.is_expired(now);
            let state = card.state;
            let response = DiscountCardResponse::from_model(card, now);
            if expired {
                expired_cards.push(response);
            } else {
                match state {
                    CardState::Earned => available_cards.push(response),
                    CardState::Scratched => scratched_cards.push(response),
                    CardState::Used => used_cards.push(response),
                }
            }
        }

        LoyaltyStatusResponse {
            venue_id,
            booking_count,
            bookings_to_next_reward,
            next_milestone,
            available_cards,
            scratched_cards,
            used_cards,
            expired_cards,
        }
    }

    async fn ensure_record<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i64,
        venue_id: i64,
    ) -> AppResult<()> {
        let insert = records::Entity::insert(records::ActiveModel {
            user_id: Set(user_id),
            venue_id: Set(venue_id),
            booking_count: Set(0),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::columns([records::Column::UserId, records::Column::VenueId])
                .do_nothing()
                .to_owned(),
        )
        .exec(conn)
        .await;

        match insert {
            Ok(_) => Ok(()),
            // the record already existed, which is exactly what we want
            Err(DbErr::RecordNotInserted) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn mint_card<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i64,
        venue_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<cards::Model> {
        let percentage = pick_discount_tier(&self.config.discount_tiers).ok_or_else(|| {
            AppError::ConfigError("loyalty.discount_tiers must not be empty".to_string())
        })?;

        // card codes are random; check-then-insert and retry on the rare hit
        let mut card_code = generate_card_code();
        for _ in 0..5 {
            let exists = cards::Entity::find()
                .filter(cards::Column::CardCode.eq(card_code.clone()))
                .one(conn)
                .await?;
            if exists.is_none() {
                break;
            }
            card_code = generate_card_code();
        }

        let card = cards::ActiveModel {
            user_id: Set(user_id),
            venue_id: Set(venue_id),
            card_code: Set(card_code),
            discount_percentage: Set(percentage),
            state: Set(CardState::Earned),
            earned_at: Set(now),
            expires_at: Set(now + Duration::days(self.config.card_validity_days)),
            ..Default::default()
        }
        .insert(conn)
        .await?;

        Ok(card)
    }

    /// Turns a failed scratch into the most specific error we can report.
    async fn explain_card_failure(&self, user_id: i64, card_id: i64, now: DateTime<Utc>) -> AppError {
        let card = match cards::Entity::find_by_id(card_id).one(&self.pool).await {
            Ok(Some(c)) if c.user_id == user_id => c,
            Ok(_) => return AppError::NotFound("Discount card not found".to_string()),
            Err(e) => return e.into(),
        };

        if card.is_expired(now) {
            return AppError::ValidationError("Discount card has expired".to_string());
        }
        match card.state {
            CardState::Scratched => {
                AppError::ValidationError("Discount card has already been scratched".to_string())
            }
            CardState::Used => {
                AppError::ValidationError("Discount card has already been used".to_string())
            }
            CardState::Earned => {
                // raced with another scratch that has not committed yet
                AppError::Conflict("Discount card is being modified, try again".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn milestone_every_interval() {
        assert!(!is_milestone(0, 5));
        assert!(!is_milestone(4, 5));
        assert!(is_milestone(5, 5));
        assert!(!is_milestone(6, 5));
        assert!(is_milestone(10, 5));
    }

    #[test]
    fn milestone_guards_bad_interval() {
        assert!(!is_milestone(5, 0));
        assert!(!is_milestone(-5, 5));
    }

    #[test]
    fn tier_is_drawn_from_the_configured_set() {
        let tiers = vec![35, 45, 55];
        for _ in 0..50 {
            let tier = pick_discount_tier(&tiers).unwrap();
            assert!(tiers.contains(&tier));
        }
        assert_eq!(pick_discount_tier(&[]), None);
    }
}
