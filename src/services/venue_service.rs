use crate::entities::{
    booking_entity as bookings, court_entity as courts, discount_card_entity as cards,
    loyalty_record_entity as loyalty, time_slot_block_entity as blocks, venue_entity as venues,
    BookingStatus,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    CourtResponse, CreateCourtRequest, CreateTimeSlotBlockRequest, CreateVenueRequest,
    CurrentUser, PaginatedResponse, PaginationParams, TimeSlotBlockResponse, UpdateCourtRequest,
    UpdateVenueRequest, VenueDetailResponse, VenueQuery, VenueResponse,
};
use crate::services::booking_service::{parse_date, parse_time};
use chrono::Utc;
use rand::seq::SliceRandom;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

#[derive(Clone)]
pub struct VenueService {
    pool: DatabaseConnection,
}

fn amenities_to_json(amenities: Option<Vec<String>>) -> AppResult<Option<String>> {
    match amenities {
        Some(list) => Ok(Some(serde_json::to_string(&list)?)),
        None => Ok(None),
    }
}

impl VenueService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn create_venue(
        &self,
        user: &CurrentUser,
        request: CreateVenueRequest,
    ) -> AppResult<VenueResponse> {
        if !user.role.can_manage_venues() {
            return Err(AppError::PermissionDenied);
        }

        let open_time = parse_time(&request.open_time)?;
        let close_time = parse_time(&request.close_time)?;
        if open_time >= close_time {
            return Err(AppError::ValidationError(
                "Opening time must be before closing time".to_string(),
            ));
        }
        if request.hourly_rate <= 0 {
            return Err(AppError::ValidationError(
                "Hourly rate must be positive".to_string(),
            ));
        }

        let duplicate = venues::Entity::find()
            .filter(venues::Column::Name.eq(request.name.clone()))
            .filter(venues::Column::Location.eq(request.location.clone()))
            .one(&self.pool)
            .await?;
        if duplicate.is_some() {
            return Err(AppError::Conflict(
                "A venue with this name already exists at this location".to_string(),
            ));
        }

        let venue = venues::ActiveModel {
            owner_id: Set(user.id),
            name: Set(request.name),
            location: Set(request.location),
            description: Set(request.description),
            hourly_rate: Set(request.hourly_rate),
            open_time: Set(open_time),
            close_time: Set(close_time),
            amenities: Set(amenities_to_json(request.amenities)?),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Venue {} created by user {}", venue.id, user.id);
        Ok(venue.into())
    }

    pub async fn update_venue(
        &self,
        user: &CurrentUser,
        venue_id: i64,
        request: UpdateVenueRequest,
    ) -> AppResult<VenueResponse> {
        let venue = self.owned_venue(user, venue_id).await?;

        let mut am = venue.into_active_model();
        if let Some(name) = request.name {
            am.name = Set(name);
        }
        if let Some(location) = request.location {
            am.location = Set(location);
        }
        if let Some(description) = request.description {
            am.description = Set(Some(description));
        }
        if let Some(hourly_rate) = request.hourly_rate {
            if hourly_rate <= 0 {
                return Err(AppError::ValidationError(
                    "Hourly rate must be positive".to_string(),
                ));
            }
            am.hourly_rate = Set(hourly_rate);
        }
        if let Some(open_time) = request.open_time {
            am.open_time = Set(parse_time(&open_time)?);
        }
        if let Some(close_time) = request.close_time {
            am.close_time = Set(parse_time(&close_time)?);
        }
        if request.amenities.is_some() {
            am.amenities = Set(amenities_to_json(request.amenities)?);
        }
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&self.pool).await?;

        Ok(updated.into())
    }

    /// Removes the venue along with its courts, blocked slots, loyalty
    /// records and discount cards. Refused while open bookings exist so no
    /// paid-for slot silently loses its venue.
    pub async fn delete_venue(&self, user: &CurrentUser, venue_id: i64) -> AppResult<()> {
        self.owned_venue(user, venue_id).await?;

        let txn = self.pool.begin().await?;

        let open = bookings::Entity::find()
            .filter(bookings::Column::VenueId.eq(venue_id))
            .filter(bookings::Column::Status.eq(BookingStatus::Booked))
            .count(&txn)
            .await?;
        if open > 0 {
            return Err(AppError::Conflict(format!(
                "Venue has {open} open booking(s); cancel or complete them first"
            )));
        }

        courts::Entity::delete_many()
            .filter(courts::Column::VenueId.eq(venue_id))
            .exec(&txn)
            .await?;
        blocks::Entity::delete_many()
            .filter(blocks::Column::VenueId.eq(venue_id))
            .exec(&txn)
            .await?;
        loyalty::Entity::delete_many()
            .filter(loyalty::Column::VenueId.eq(venue_id))
            .exec(&txn)
            .await?;
        cards::Entity::delete_many()
            .filter(cards::Column::VenueId.eq(venue_id))
            .exec(&txn)
            .await?;
        venues::Entity::delete_by_id(venue_id).exec(&txn).await?;

        txn.commit().await?;

        log::info!("Venue {venue_id} deleted by user {}", user.id);
        Ok(())
    }

    pub async fn list_venues(
        &self,
        query: &VenueQuery,
    ) -> AppResult<PaginatedResponse<VenueResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut find = venues::Entity::find();
        if let Some(search) = &query.search {
            find = find.filter(
                Condition::any()
                    .add(venues::Column::Name.contains(search))
                    .add(venues::Column::Location.contains(search)),
            );
        }

        let total = find.clone().count(&self.pool).await? as i64;
        let items = find
            .order_by_asc(venues::Column::Name)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::new(
            items.into_iter().map(VenueResponse::from).collect(),
            &params,
            total,
        ))
    }

    /// Random sample for the landing page. The venue table is small, so a
    /// fetch-and-shuffle beats backend-specific RANDOM() ordering.
    pub async fn random_venues(&self, count: usize) -> AppResult<Vec<VenueResponse>> {
        let mut all = venues::Entity::find().all(&self.pool).await?;
        let mut rng = rand::thread_rng();
        all.shuffle(&mut rng);
        Ok(all
            .into_iter()
            .take(count)
            .map(VenueResponse::from)
            .collect())
    }

    pub async fn get_venue(&self, venue_id: i64) -> AppResult<VenueDetailResponse> {
        let venue = venues::Entity::find_by_id(venue_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Venue not found".to_string()))?;

        let venue_courts = courts::Entity::find()
            .filter(courts::Column::VenueId.eq(venue_id))
            .order_by_asc(courts::Column::Name)
            .all(&self.pool)
            .await?;

        Ok(VenueDetailResponse {
            venue: venue.into(),
            courts: venue_courts.into_iter().map(CourtResponse::from).collect(),
        })
    }

    pub async fn my_venues(&self, user: &CurrentUser) -> AppResult<Vec<VenueResponse>> {
        let owned = venues::Entity::find()
            .filter(venues::Column::OwnerId.eq(user.id))
            .order_by_asc(venues::Column::Name)
            .all(&self.pool)
            .await?;
        Ok(owned.into_iter().map(VenueResponse::from).collect())
    }

    pub async fn add_court(
        &self,
        user: &CurrentUser,
        venue_id: i64,
        request: CreateCourtRequest,
    ) -> AppResult<CourtResponse> {
        self.owned_venue(user, venue_id).await?;

        let duplicate = courts::Entity::find()
            .filter(courts::Column::VenueId.eq(venue_id))
            .filter(courts::Column::Name.eq(request.name.clone()))
            .one(&self.pool)
            .await?;
        if duplicate.is_some() {
            return Err(AppError::Conflict(
                "A court with this name already exists at this venue".to_string(),
            ));
        }

        let court = courts::ActiveModel {
            venue_id: Set(venue_id),
            name: Set(request.name),
            sport_type: Set(request.sport_type),
            hourly_rate: Set(request.hourly_rate),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(court.into())
    }

    pub async fn update_court(
        &self,
        user: &CurrentUser,
        court_id: i64,
        request: UpdateCourtRequest,
    ) -> AppResult<CourtResponse> {
        let court = courts::Entity::find_by_id(court_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Court not found".to_string()))?;
        self.owned_venue(user, court.venue_id).await?;

        let mut am = court.into_active_model();
        if let Some(name) = request.name {
            am.name = Set(name);
        }
        if let Some(sport_type) = request.sport_type {
            am.sport_type = Set(sport_type);
        }
        if request.hourly_rate.is_some() {
            am.hourly_rate = Set(request.hourly_rate);
        }
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&self.pool).await?;

        Ok(updated.into())
    }

    pub async fn delete_court(&self, user: &CurrentUser, court_id: i64) -> AppResult<()> {
        let court = courts::Entity::find_by_id(court_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Court not found".to_string()))?;
        self.owned_venue(user, court.venue_id).await?;

        courts::Entity::delete_by_id(court_id)
            .exec(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn create_time_slot_block(
        &self,
        user: &CurrentUser,
        venue_id: i64,
        request: CreateTimeSlotBlockRequest,
    ) -> AppResult<TimeSlotBlockResponse> {
        self.owned_venue(user, venue_id).await?;

        let date = parse_date(&request.date)?;
        let start_time = parse_time(&request.start_time)?;
        let end_time = parse_time(&request.end_time)?;
        if start_time >= end_time {
            return Err(AppError::ValidationError(
                "Start time must be before end time".to_string(),
            ));
        }

        let block = blocks::ActiveModel {
            venue_id: Set(venue_id),
            court_name: Set(request.court_name),
            date: Set(date),
            start_time: Set(start_time),
            end_time: Set(end_time),
            reason: Set(request.reason),
            created_by: Set(user.id),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(block.into())
    }

    pub async fn list_time_slot_blocks(
        &self,
        user: &CurrentUser,
        venue_id: i64,
    ) -> AppResult<Vec<TimeSlotBlockResponse>> {
        self.owned_venue(user, venue_id).await?;

        let all = blocks::Entity::find()
            .filter(blocks::Column::VenueId.eq(venue_id))
            .order_by_asc(blocks::Column::Date)
            .all(&self.pool)
            .await?;
        Ok(all.into_iter().map(TimeSlotBlockResponse::from).collect())
    }

    pub async fn delete_time_slot_block(&self, user: &CurrentUser, block_id: i64) -> AppResult<()> {
        let block = blocks::Entity::find_by_id(block_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Time slot block not found".to_string()))?;
        self.owned_venue(user, block.venue_id).await?;

        blocks::Entity::delete_by_id(block_id)
            .exec(&self.pool)
            .await?;
        Ok(())
    }

    /// Loads the venue and checks the caller may manage it.
    async fn owned_venue(&self, user: &CurrentUser, venue_id: i64) -> AppResult<venues::Model> {
        let venue = venues::Entity::find_by_id(venue_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Venue not found".to_string()))?;

        if !user.is_admin() && venue.owner_id != user.id {
            return Err(AppError::PermissionDenied);
        }
        Ok(venue)
    }
}
