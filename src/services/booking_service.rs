use crate::entities::{
    booking_entity as bookings, court_entity as courts, time_slot_block_entity as blocks,
    venue_entity as venues, BookingStatus,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    AutoCompleteSummary, BookingQuery, BookingResponse, CompleteBookingResponse,
    CreateBookingRequest, CreateBookingResponse, CurrentUser, DiscountApplied, PaginatedResponse,
    PaginationParams,
};
use crate::services::LoyaltyService;
use chrono::{NaiveDate, NaiveTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

#[derive(Clone)]
pub struct BookingService {
    pool: DatabaseConnection,
    loyalty_service: LoyaltyService,
}

pub(crate) fn parse_date(s: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::ValidationError("Invalid date, expected YYYY-MM-DD".to_string()))
}

pub(crate) fn parse_time(s: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| AppError::ValidationError("Invalid time, expected HH:MM".to_string()))
}

/// Half-open interval overlap: [a_start, a_end) vs [b_start, b_end).
/// Back-to-back slots (one ends exactly when the other starts) do not clash.
fn ranges_overlap(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Two bookings contend for the same court when either side did not name a
/// court (whole-venue hold) or both named the same one.
fn courts_clash(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}

/// Duration-based price in whole rupees.
fn compute_price(hourly_rate: i64, start: NaiveTime, end: NaiveTime) -> i64 {
    let minutes = (end - start).num_minutes();
    hourly_rate * minutes / 60
}

fn apply_discount(original: i64, percentage: i32) -> (i64, i64) {
    let discount = original * percentage as i64 / 100;
    (discount, original - discount)
}

impl BookingService {
    pub fn new(pool: DatabaseConnection, loyalty_service: LoyaltyService) -> Self {
        Self {
            pool,
            loyalty_service,
        }
    }

    /// Creates a booking in a single transaction: window validation, conflict
    /// check against live bookings and blocked slots, pricing, and (when a
    /// card is supplied) the guarded card spend. Any failure rolls the whole
    /// thing back, so there are no partial writes.
    pub async fn create_booking(
        &self,
        user: &CurrentUser,
        request: CreateBookingRequest,
    ) -> AppResult<CreateBookingResponse> {
        let date = parse_date(&request.date)?;
        let start_time = parse_time(&request.start_time)?;
        let end_time = parse_time(&request.end_time)?;

        if start_time >= end_time {
            return Err(AppError::ValidationError(
                "Start time must be before end time".to_string(),
            ));
        }

        let now = Utc::now();
        let today = now.date_naive();
        if date < today || (date == today && start_time < now.time()) {
            return Err(AppError::ValidationError(
                "Cannot book a time slot in the past".to_string(),
            ));
        }

        let txn = self.pool.begin().await?;

        let venue = venues::Entity::find_by_id(request.venue_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Venue not found".to_string()))?;

        if start_time < venue.open_time || end_time > venue.close_time {
            return Err(AppError::ValidationError(format!(
                "Venue is open {} to {}",
                venue.open_time.format("%H:%M"),
                venue.close_time.format("%H:%M")
            )));
        }

        let hourly_rate = match request.court_name.as_deref() {
            Some(court_name) => {
                let court = courts::Entity::find()
                    .filter(courts::Column::VenueId.eq(venue.id))
                    .filter(courts::Column::Name.eq(court_name))
                    .one(&txn)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Court not found".to_string()))?;
                court.hourly_rate.unwrap_or(venue.hourly_rate)
            }
            None => venue.hourly_rate,
        };

        // conflict check against every non-cancelled booking for the day
        let day_bookings = bookings::Entity::find()
            .filter(bookings::Column::VenueId.eq(venue.id))
            .filter(bookings::Column::Date.eq(date))
            .filter(bookings::Column::Status.ne(BookingStatus::Cancelled))
            .all(&txn)
            .await?;

        for existing in &day_bookings {
            if courts_clash(request.court_name.as_deref(), existing.court_name.as_deref())
                && ranges_overlap(start_time, end_time, existing.start_time, existing.end_time)
            {
                return Err(AppError::Conflict(
                    "Time slot is already booked".to_string(),
                ));
            }
        }

        // blocked slots are a denylist maintained by the facility manager
        let day_blocks = blocks::Entity::find()
            .filter(blocks::Column::VenueId.eq(venue.id))
            .filter(blocks::Column::Date.eq(date))
            .all(&txn)
            .await?;

        for block in &day_blocks {
            if courts_clash(request.court_name.as_deref(), block.court_name.as_deref())
                && ranges_overlap(start_time, end_time, block.start_time, block.end_time)
            {
                let reason = block.reason.as_deref().unwrap_or("unavailable");
                return Err(AppError::Conflict(format!(
                    "Time slot is blocked: {reason}"
                )));
            }
        }

        let original_amount = compute_price(hourly_rate, start_time, end_time);

        let (discount_amount, total_amount, card) = match request.discount_card_id {
            Some(card_id) => {
                let card = self
                    .loyalty_service
                    .load_redeemable_card_tx(&txn, user.id, venue.id, card_id, now)
                    .await?;
                let (discount, total) = apply_discount(original_amount, card.discount_percentage);
                (discount, total, Some(card))
            }
            None => (0, original_amount, None),
        };

        let booking = bookings::ActiveModel {
            venue_id: Set(venue.id),
            user_id: Set(user.id),
            court_name: Set(request.court_name.clone()),
            date: Set(date),
            start_time: Set(start_time),
            end_time: Set(end_time),
            status: Set(BookingStatus::Booked),
            original_amount: Set(original_amount),
            discount_amount: Set(discount_amount),
            total_amount: Set(total_amount),
            discount_card_id: Set(card.as_ref().map(|c| c.id)),
            notes: Set(request.notes.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let discount_applied = if let Some(card) = card {
            self.loyalty_service
                .mark_card_used_tx(&txn, card.id, booking.id, now)
                .await?;
            Some(DiscountApplied {
                original: original_amount,
                discount: discount_amount,
                final_amount: total_amount,
                percentage: card.discount_percentage,
            })
        } else {
            None
        };

        txn.commit().await?;

        log::info!(
            "Booking {} created for user {} at venue {} on {}",
            booking.id,
            user.id,
            venue.id,
            date
        );

        Ok(CreateBookingResponse {
            booking: booking.into(),
            discount_applied,
        })
    }

    /// Player cancels their own booking; admins may cancel any. Valid only
    /// from `booked`; cancellation never touches loyalty counts.
    pub async fn cancel_booking(&self, user: &CurrentUser, booking_id: i64) -> AppResult<BookingResponse> {
        let booking = bookings::Entity::find_by_id(booking_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        if booking.user_id != user.id && !user.is_admin() {
            return Err(AppError::PermissionDenied);
        }

        self.transition(&self.pool, booking_id, BookingStatus::Booked, BookingStatus::Cancelled)
            .await?;

        let updated = self.reload(booking_id).await?;
        Ok(updated.into())
    }

    /// Facility manager (of the venue) or admin marks a booking completed and
    /// the loyalty counter ticks in the same transaction.
    pub async fn complete_booking(
        &self,
        user: &CurrentUser,
        booking_id: i64,
    ) -> AppResult<CompleteBookingResponse> {
        let booking = bookings::Entity::find_by_id(booking_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        self.authorize_venue_manager(user, booking.venue_id).await?;

        let txn = self.pool.begin().await?;
        self.transition(&txn, booking_id, BookingStatus::Booked, BookingStatus::Completed)
            .await?;
        let loyalty_update = self
            .loyalty_service
            .record_completed_booking_tx(&txn, booking.user_id, booking.venue_id)
            .await?;
        txn.commit().await?;

        let updated = self.reload(booking_id).await?;
        Ok(CompleteBookingResponse {
            booking: updated.into(),
            loyalty_update,
        })
    }

    /// Sweeps every `booked` row whose slot already ended to `completed`,
    /// ticking loyalty per row. Each row commits on its own (one bad row must
    /// not hold the rest hostage) and the guarded transition makes the sweep
    /// idempotent: a second run finds nothing left to move.
    pub async fn auto_complete_past_due(&self) -> AppResult<AutoCompleteSummary> {
        let now = Utc::now();
        let today = now.date_naive();

        let due = bookings::Entity::find()
            .filter(bookings::Column::Status.eq(BookingStatus::Booked))
            .filter(
                Condition::any().add(bookings::Column::Date.lt(today)).add(
                    Condition::all()
                        .add(bookings::Column::Date.eq(today))
                        .add(bookings::Column::EndTime.lte(now.time())),
                ),
            )
            .order_by_asc(bookings::Column::Id)
            .all(&self.pool)
            .await?;

        let mut summary = AutoCompleteSummary {
            completed_bookings: 0,
            rewards_earned: 0,
        };

        for booking in due {
            let txn = self.pool.begin().await?;
            let moved = self
                .try_transition(&txn, booking.id, BookingStatus::Booked, BookingStatus::Completed)
                .await?;
            if !moved {
                // someone else completed or cancelled it since the scan
                txn.commit().await?;
                continue;
            }
            let update = self
                .loyalty_service
                .record_completed_booking_tx(&txn, booking.user_id, booking.venue_id)
                .await?;
            txn.commit().await?;

            summary.completed_bookings += 1;
            if update.card_earned {
                summary.rewards_earned += 1;
            }
        }

        if summary.completed_bookings > 0 {
            log::info!(
                "Auto-complete sweep: {} bookings completed, {} rewards earned",
                summary.completed_bookings,
                summary.rewards_earned
            );
        }

        Ok(summary)
    }

    pub async fn get_user_bookings(
        &self,
        user_id: i64,
        query: &BookingQuery,
    ) -> AppResult<PaginatedResponse<BookingResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut find = bookings::Entity::find().filter(bookings::Column::UserId.eq(user_id));
        if let Some(status) = query.status {
            find = find.filter(bookings::Column::Status.eq(status));
        }

        let total = find.clone().count(&self.pool).await? as i64;
        let items = find
            .order_by_desc(bookings::Column::Date)
            .order_by_desc(bookings::Column::StartTime)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::new(
            items.into_iter().map(BookingResponse::from).collect(),
            &params,
            total,
        ))
    }

    pub async fn get_venue_bookings(
        &self,
        user: &CurrentUser,
        venue_id: i64,
        query: &BookingQuery,
    ) -> AppResult<PaginatedResponse<BookingResponse>> {
        self.authorize_venue_manager(user, venue_id).await?;

        let params = PaginationParams::new(query.page, query.per_page);

        let mut find = bookings::Entity::find().filter(bookings::Column::VenueId.eq(venue_id));
        if let Some(status) = query.status {
            find = find.filter(bookings::Column::Status.eq(status));
        }

        let total = find.clone().count(&self.pool).await? as i64;
        let items = find
            .order_by_desc(bookings::Column::Date)
            .order_by_desc(bookings::Column::StartTime)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::new(
            items.into_iter().map(BookingResponse::from).collect(),
            &params,
            total,
        ))
    }

    pub async fn get_all_bookings(
        &self,
        query: &BookingQuery,
    ) -> AppResult<PaginatedResponse<BookingResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut find = bookings::Entity::find();
        if let Some(status) = query.status {
            find = find.filter(bookings::Column::Status.eq(status));
        }

        let total = find.clone().count(&self.pool).await? as i64;
        let items = find
            .order_by_desc(bookings::Column::Id)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::new(
            items.into_iter().map(BookingResponse::from).collect(),
            &params,
            total,
        ))
    }

    pub async fn delete_booking(&self, booking_id: i64) -> AppResult<()> {
        let res = bookings::Entity::delete_by_id(booking_id)
            .exec(&self.pool)
            .await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound("Booking not found".to_string()));
        }
        Ok(())
    }

    // -----------------------------
    // internal helpers
    // -----------------------------

    async fn reload(&self, booking_id: i64) -> AppResult<bookings::Model> {
        bookings::Entity::find_by_id(booking_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
    }

    /// Guarded status transition; errors when the booking was not in `from`.
    async fn transition<C: ConnectionTrait>(
        &self,
        conn: &C,
        booking_id: i64,
        from: BookingStatus,
        to: BookingStatus,
    ) -> AppResult<()> {
        if self.try_transition(conn, booking_id, from, to).await? {
            Ok(())
        } else {
            Err(AppError::ValidationError(format!(
                "Booking is not in '{from}' state"
            )))
        }
    }

    async fn try_transition<C: ConnectionTrait>(
        &self,
        conn: &C,
        booking_id: i64,
        from: BookingStatus,
        to: BookingStatus,
    ) -> AppResult<bool> {
        let res = bookings::Entity::update_many()
            .col_expr(bookings::Column::Status, Expr::value(to))
            .col_expr(bookings::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(bookings::Column::Id.eq(booking_id))
            .filter(bookings::Column::Status.eq(from))
            .exec(conn)
            .await?;
        Ok(res.rows_affected == 1)
    }

    /// Admin, or the facility manager owning the venue.
    async fn authorize_venue_manager(&self, user: &CurrentUser, venue_id: i64) -> AppResult<()> {
        if user.is_admin() {
            return Ok(());
        }
        if !user.role.can_manage_venues() {
            return Err(AppError::PermissionDenied);
        }
        let venue = venues::Entity::find_by_id(venue_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Venue not found".to_string()))?;
        if venue.owner_id != user.id {
            return Err(AppError::PermissionDenied);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> NaiveTime {
        parse_time(s).unwrap()
    }

    #[test]
    fn overlap_is_half_open() {
        assert!(ranges_overlap(t("10:00"), t("12:00"), t("11:00"), t("13:00")));
        assert!(ranges_overlap(t("10:00"), t("12:00"), t("10:30"), t("11:30")));
        // back-to-back is fine
        assert!(!ranges_overlap(t("10:00"), t("12:00"), t("12:00"), t("14:00")));
        assert!(!ranges_overlap(t("10:00"), t("12:00"), t("08:00"), t("10:00")));
    }

    #[test]
    fn court_clash_rules() {
        assert!(courts_clash(Some("Court 1"), Some("Court 1")));
        assert!(!courts_clash(Some("Court 1"), Some("Court 2")));
        // an unnamed booking holds the whole venue for the window
        assert!(courts_clash(None, Some("Court 1")));
        assert!(courts_clash(Some("Court 1"), None));
        assert!(courts_clash(None, None));
    }

    #[test]
    fn price_is_duration_times_rate() {
        // 2 hours at 500/hr
        assert_eq!(compute_price(500, t("18:00"), t("20:00")), 1000);
        // 90 minutes at 400/hr
        assert_eq!(compute_price(400, t("18:00"), t("19:30")), 600);
    }

    #[test]
    fn discount_breakdown_matches_percentage() {
        // 1000 at 45% off -> 450 discount, 550 payable
        let (discount, total) = apply_discount(1000, 45);
        assert_eq!(discount, 450);
        assert_eq!(total, 550);

        let (discount, total) = apply_discount(1000, 0);
        assert_eq!(discount, 0);
        assert_eq!(total, 1000);
    }

    #[test]
    fn time_parsing_accepts_minutes_and_seconds() {
        assert_eq!(t("09:30"), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(
            parse_time("09:30:00").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert!(parse_time("9 am").is_err());
    }
}
