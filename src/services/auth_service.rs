use crate::entities::{user_entity as users, UserRole};
use crate::error::{AppError, AppResult};
use crate::models::{
    AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, SendOtpRequest,
    SendOtpResponse, UpdateProfileRequest, UserResponse, VerifyOtpRequest,
};
use crate::utils::{hash_password, validate_password, verify_password, JwtService};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

const OTP_TTL_SECS: i64 = 300;
const OTP_RESEND_SECS: i64 = 60;

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
    // email -> (code, expiry). No delivery gateway wired up; codes go to the
    // log, which is enough for the flows the client exercises.
    otp_codes: Arc<RwLock<HashMap<String, (String, DateTime<Utc>)>>>,
}

fn generate_otp_code() -> String {
    let mut rng = rand::thread_rng();
    format!("{:06}", rng.gen_range(100000..=999999))
}

fn validate_email(email: &str) -> AppResult<()> {
    let ok = email.contains('@') && email.len() >= 5 && !email.contains(char::is_whitespace);
    if !ok {
        return Err(AppError::ValidationError("Invalid email address".to_string()));
    }
    Ok(())
}

impl AuthService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService) -> Self {
        Self {
            pool,
            jwt_service,
            otp_codes: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        validate_email(&request.email)?;
        validate_password(&request.password)?;

        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(request.email.clone()))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict("Email is already registered".to_string()));
        }

        let password_hash = hash_password(&request.password)?;

        // everyone starts as a player; facility managers are promoted via
        // an admin invitation
        let user = users::ActiveModel {
            email: Set(request.email),
            password_hash: Set(password_hash),
            full_name: Set(request.full_name),
            phone: Set(request.phone),
            role: Set(UserRole::Player),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Registered user {} ({})", user.id, user.email);
        self.issue_tokens(user)
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(request.email.clone()))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid email or password".to_string()))?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::AuthError("Invalid email or password".to_string()));
        }

        self.issue_tokens(user)
    }

    pub async fn refresh_token(&self, token: &str) -> AppResult<AuthResponse> {
        let claims = self.jwt_service.verify_refresh_token(token)?;
        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AppError::AuthError("Invalid refresh token".to_string()))?;

        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("User no longer exists".to_string()))?;

        self.issue_tokens(user)
    }

    pub async fn send_otp(&self, request: SendOtpRequest) -> AppResult<SendOtpResponse> {
        validate_email(&request.email)?;

        {
            let codes = self.otp_codes.read().await;
            if let Some((_, expires_at)) = codes.get(&request.email) {
                let issued_at = *expires_at - Duration::seconds(OTP_TTL_SECS);
                if Utc::now().signed_duration_since(issued_at) < Duration::seconds(OTP_RESEND_SECS)
                {
                    return Err(AppError::ValidationError(
                        "OTP was sent recently, try again in a minute".to_string(),
                    ));
                }
            }
        }

        let code = generate_otp_code();
        let expires_at = Utc::now() + Duration::seconds(OTP_TTL_SECS);

        log::info!("OTP for {}: {code}", request.email);

        let mut codes = self.otp_codes.write().await;
        codes.insert(request.email, (code, expires_at));

        Ok(SendOtpResponse {
            expires_in: OTP_TTL_SECS,
        })
    }

    /// Consumes the code on success; a second verify with the same code fails.
    pub async fn verify_otp(&self, request: VerifyOtpRequest) -> AppResult<()> {
        let mut codes = self.otp_codes.write().await;
        match codes.get(&request.email) {
            Some((code, expires_at)) if *expires_at >= Utc::now() && *code == request.code => {
                codes.remove(&request.email);
                Ok(())
            }
            Some((_, expires_at)) if *expires_at < Utc::now() => {
                codes.remove(&request.email);
                Err(AppError::ValidationError("OTP has expired".to_string()))
            }
            _ => Err(AppError::ValidationError("Invalid OTP".to_string())),
        }
    }

    pub async fn get_profile(&self, user_id: i64) -> AppResult<UserResponse> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        Ok(user.into())
    }

    pub async fn update_profile(
        &self,
        user_id: i64,
        request: UpdateProfileRequest,
    ) -> AppResult<UserResponse> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let mut am = user.into_active_model();
        if let Some(full_name) = request.full_name {
            am.full_name = Set(full_name);
        }
        if let Some(phone) = request.phone {
            am.phone = Set(Some(phone));
        }
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&self.pool).await?;

        Ok(updated.into())
    }

    pub async fn change_password(
        &self,
        user_id: i64,
        request: ChangePasswordRequest,
    ) -> AppResult<()> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !verify_password(&request.old_password, &user.password_hash)? {
            return Err(AppError::AuthError("Old password is incorrect".to_string()));
        }
        validate_password(&request.new_password)?;

        let password_hash = hash_password(&request.new_password)?;
        let mut am = user.into_active_model();
        am.password_hash = Set(password_hash);
        am.updated_at = Set(Some(Utc::now()));
        am.update(&self.pool).await?;

        Ok(())
    }

    fn issue_tokens(&self, user: users::Model) -> AppResult<AuthResponse> {
        let role = user.role.to_string();
        let access_token = self.jwt_service.generate_access_token(user.id, &role)?;
        let refresh_token = self.jwt_service.generate_refresh_token(user.id, &role)?;
        let expires_in = self.jwt_service.get_access_token_expires_in();

        Ok(AuthResponse {
            user: user.into(),
            access_token,
            refresh_token,
            expires_in,
        })
    }
}
