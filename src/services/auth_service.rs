use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use password_hash::rand_core::OsRng;

use crate::{
    db::DbPool,
    dto::auth::{
        Claims, LoginRequest, RefreshRequest, RegisterRequest, ResetPasswordRequest, TokenResponse,
        TokenType, UpdateProfileRequest, UserResponse,
    },
    error::{AppError, AppResult},
    models::User,
    response::{ApiResponse, Meta},
};

pub const ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 15;
pub const REFRESH_TOKEN_EXPIRE_DAYS: i64 = 7;

pub fn jwt_secret() -> AppResult<String> {
    std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))
}

pub fn create_token(
    secret: &str,
    user_id: i64,
    role: &str,
    token_type: TokenType,
    ttl: Duration,
) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(ttl)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        token_type,
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub fn create_access_token(secret: &str, user_id: i64, role: &str) -> AppResult<String> {
    create_token(
        secret,
        user_id,
        role,
        TokenType::Access,
        Duration::minutes(ACCESS_TOKEN_EXPIRE_MINUTES),
    )
}

pub fn create_refresh_token(secret: &str, user_id: i64, role: &str) -> AppResult<String> {
    create_token(
        secret,
        user_id,
        role,
        TokenType::Refresh,
        Duration::days(REFRESH_TOKEN_EXPIRE_DAYS),
    )
}

/// Stateless verification: signature, expiry, and the `type` claim must all
/// check out. There is no revocation list; an issued token stays valid for its
/// full lifetime.
pub fn verify_token(secret: &str, token: &str, expected: TokenType) -> AppResult<Claims> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized)?;

    if decoded.claims.token_type != expected {
        return Err(AppError::Unauthorized);
    }

    Ok(decoded.claims)
}

fn token_pair(user: &User) -> AppResult<(String, String)> {
    let secret = jwt_secret()?;
    let access = create_access_token(&secret, user.id, &user.role)?;
    let refresh = create_refresh_token(&secret, user.id, &user.role)?;
    Ok((access, refresh))
}

fn token_response(user: User) -> AppResult<TokenResponse> {
    let (access_token, refresh_token) = token_pair(&user)?;
    Ok(TokenResponse {
        access_token,
        refresh_token,
        token_type: "bearer".to_string(),
        user: user.into(),
    })
}

pub async fn register_user(
    pool: &DbPool,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<TokenResponse>> {
    let RegisterRequest {
        email,
        phone,
        password,
        first_name,
        last_name,
    } = payload;

    let exist: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1 OR phone = $2")
        .bind(email.as_str())
        .bind(phone.as_str())
        .fetch_optional(pool)
        .await?;

    if exist.is_some() {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let password_hash = hash_password(&password)?;

    let user: User = sqlx::query_as(
        r#"
        INSERT INTO users (email, phone, password_hash, first_name, last_name, role)
        VALUES ($1, $2, $3, $4, $5, 'customer')
        RETURNING *
        "#,
    )
    .bind(email.as_str())
    .bind(phone.as_str())
    .bind(password_hash)
    .bind(first_name)
    .bind(last_name)
    .fetch_one(pool)
    .await?;

    tracing::info!(user_id = user.id, "user registered");

    Ok(ApiResponse::success(
        "User created",
        token_response(user)?,
        None,
    ))
}

pub async fn login_user(
    pool: &DbPool,
    payload: LoginRequest,
) -> AppResult<ApiResponse<TokenResponse>> {
    let LoginRequest { email, password } = payload;
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(pool)
        .await?;

    // Missing user and wrong password must be indistinguishable to the caller.
    let user = user.ok_or(AppError::Unauthorized)?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    let argon2 = Argon2::default();
    if argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::Unauthorized);
    }

    Ok(ApiResponse::success(
        "Logged in",
        token_response(user)?,
        Some(Meta::empty()),
    ))
}

/// Refresh rotation: a valid refresh token whose subject still exists yields a
/// brand-new access/refresh pair. No reuse detection.
pub async fn refresh_tokens(
    pool: &DbPool,
    payload: RefreshRequest,
) -> AppResult<ApiResponse<TokenResponse>> {
    let secret = jwt_secret()?;
    let claims = verify_token(&secret, &payload.refresh_token, TokenType::Refresh)?;

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(claims.sub)
        .fetch_optional(pool)
        .await?;
    let user = user.ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success(
        "Tokens refreshed",
        token_response(user)?,
        Some(Meta::empty()),
    ))
}

pub async fn get_profile(pool: &DbPool, user_id: i64) -> AppResult<ApiResponse<UserResponse>> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    let user = user.ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success("Profile", user.into(), None))
}

pub async fn update_profile(
    pool: &DbPool,
    user_id: i64,
    payload: UpdateProfileRequest,
) -> AppResult<ApiResponse<UserResponse>> {
    let existing: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    let existing = existing.ok_or(AppError::NotFound)?;

    if let Some(phone) = payload.phone.as_ref().filter(|p| **p != existing.phone) {
        let taken: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM users WHERE phone = $1 AND id <> $2")
                .bind(phone.as_str())
                .bind(user_id)
                .fetch_optional(pool)
                .await?;
        if taken.is_some() {
            return Err(AppError::Conflict("Phone already in use".to_string()));
        }
    }

    // Explicit merge of the supplied fields only.
    let first_name = payload.first_name.unwrap_or(existing.first_name);
    let last_name = payload.last_name.unwrap_or(existing.last_name);
    let phone = payload.phone.unwrap_or(existing.phone);

    let user: User = sqlx::query_as(
        r#"
        UPDATE users
        SET first_name = $2, last_name = $3, phone = $4, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(first_name)
    .bind(last_name)
    .bind(phone)
    .fetch_one(pool)
    .await?;

    Ok(ApiResponse::success(
        "Profile updated",
        user.into(),
        Some(Meta::empty()),
    ))
}

/// Enumeration-resistant: the acknowledgement is identical whether or not the
/// account exists, and no email is dispatched here.
pub async fn reset_password_request(
    pool: &DbPool,
    payload: ResetPasswordRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let _user: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(payload.email.as_str())
        .fetch_optional(pool)
        .await?;

    Ok(ApiResponse::success(
        "If account exists, reset link sent to email",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(password_hash)
}
