use axum::{extract::FromRequestParts, http::header};

use crate::{
    dto::auth::TokenType,
    error::AppError,
    services::auth_service::{jwt_secret, verify_token},
};

/// Authenticated caller extracted from a bearer access token. Any failure
/// (missing header, bad signature, expiry, refresh token presented) is a
/// uniform 401.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub role: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::Unauthorized)?;

        let auth_str = auth_header.to_str().map_err(|_| AppError::Unauthorized)?;

        if !auth_str.starts_with("Bearer ") {
            return Err(AppError::Unauthorized);
        }
        let token = auth_str.trim_start_matches("Bearer ").trim();

        let secret = jwt_secret()?;
        let claims = verify_token(&secret, token, TokenType::Access)?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}
