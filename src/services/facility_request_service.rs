use crate::entities::{
    facility_manager_request_entity as requests, user_entity as users, RequestStatus, UserRole,
};
use crate::error::{AppError, AppResult};
use crate::models::{CreateFacilityRequestRequest, CurrentUser, FacilityRequestResponse};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

/// Admin-initiated invitations that promote a player to facility_manager.
/// The status only ever moves out of `pending` once.
#[derive(Clone)]
pub struct FacilityRequestService {
    pool: DatabaseConnection,
}

impl FacilityRequestService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        admin: &CurrentUser,
        request: CreateFacilityRequestRequest,
    ) -> AppResult<FacilityRequestResponse> {
        let target = users::Entity::find()
            .filter(users::Column::Email.eq(request.email.clone()))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if target.role != UserRole::Player {
            return Err(AppError::ValidationError(
                "User already manages facilities".to_string(),
            ));
        }

        let pending = requests::Entity::find()
            .filter(requests::Column::UserId.eq(target.id))
            .filter(requests::Column::Status.eq(RequestStatus::Pending))
            .one(&self.pool)
            .await?;
        if pending.is_some() {
            return Err(AppError::Conflict(
                "User already has a pending invitation".to_string(),
            ));
        }

        let created = requests::ActiveModel {
            user_id: Set(target.id),
            invited_by: Set(admin.id),
            status: Set(RequestStatus::Pending),
            message: Set(request.message),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!(
            "Facility manager invitation {} created for user {}",
            created.id,
            target.id
        );
        Ok(created.into())
    }

    pub async fn my_requests(&self, user_id: i64) -> AppResult<Vec<FacilityRequestResponse>> {
        let list = requests::Entity::find()
            .filter(requests::Column::UserId.eq(user_id))
            .order_by_desc(requests::Column::CreatedAt)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(FacilityRequestResponse::from).collect())
    }

    pub async fn list_all(&self) -> AppResult<Vec<FacilityRequestResponse>> {
        let list = requests::Entity::find()
            .order_by_desc(requests::Column::CreatedAt)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(FacilityRequestResponse::from).collect())
    }

    /// Invitee accepts or rejects. Accepting promotes the user's role inside
    /// the same transaction as the status change.
    pub async fn respond(
        &self,
        user: &CurrentUser,
        request_id: i64,
        accept: bool,
    ) -> AppResult<FacilityRequestResponse> {
        let invitation = requests::Entity::find_by_id(request_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Invitation not found".to_string()))?;

        if invitation.user_id != user.id {
            return Err(AppError::PermissionDenied);
        }

        let new_status = if accept {
            RequestStatus::Accepted
        } else {
            RequestStatus::Rejected
        };
        let now = Utc::now();

        let txn = self.pool.begin().await?;

        let res = requests::Entity::update_many()
            .col_expr(requests::Column::Status, Expr::value(new_status))
            .col_expr(requests::Column::RespondedAt, Expr::value(Some(now)))
            .col_expr(requests::Column::UpdatedAt, Expr::value(now))
            .filter(requests::Column::Id.eq(request_id))
            .filter(requests::Column::Status.eq(RequestStatus::Pending))
            .exec(&txn)
            .await?;
        if res.rows_affected == 0 {
            return Err(AppError::ValidationError(
                "Invitation has already been responded to".to_string(),
            ));
        }

        if accept {
            let target = users::Entity::find_by_id(user.id)
                .one(&txn)
                .await?
                .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
            let mut am = target.into_active_model();
            am.role = Set(UserRole::FacilityManager);
            am.updated_at = Set(Some(now));
            am.update(&txn).await?;
        }

        txn.commit().await?;

        let updated = requests::Entity::find_by_id(request_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Invitation not found".to_string()))?;
        Ok(updated.into())
    }

    /// Admin withdraws an invitation; only pending ones can go.
    pub async fn delete(&self, request_id: i64) -> AppResult<()> {
        let res = requests::Entity::delete_many()
            .filter(requests::Column::Id.eq(request_id))
            .filter(requests::Column::Status.eq(RequestStatus::Pending))
            .exec(&self.pool)
            .await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound(
                "No pending invitation with this id".to_string(),
            ));
        }
        Ok(())
    }
}
