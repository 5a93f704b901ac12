use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::auth::{
        LoginRequest, RefreshRequest, RegisterRequest, ResetPasswordRequest, TokenResponse,
        UpdateProfileRequest, UserResponse, VerifyTokenResponse,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    services::auth_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/profile", get(get_profile).put(update_profile))
        .route("/reset-password", post(reset_password))
        .route("/verify-token", get(verify_token))
        .route("/refresh", post(refresh))
}

#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<TokenResponse>),
        (status = 400, description = "Email or phone already registered"),
    ),
    tag = "Users"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<TokenResponse>>)> {
    let resp = auth_service::register_user(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = ApiResponse<TokenResponse>),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "Users"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<TokenResponse>>> {
    let resp = auth_service::login_user(&state.pool, payload).await?;
    Ok(Json(resp))
}

// Stateless tokens: nothing to invalidate server-side.
#[utoipa::path(post, path = "/api/users/logout", security(("bearer_auth" = [])), tag = "Users")]
pub async fn logout(_user: AuthUser) -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(
        "Logged out successfully",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

#[utoipa::path(
    get,
    path = "/api/users/profile",
    responses(
        (status = 200, description = "Profile", body = ApiResponse<UserResponse>),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User no longer exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let resp = auth_service::get_profile(&state.pool, user.user_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/users/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<UserResponse>),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let resp = auth_service::update_profile(&state.pool, user.user_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/users/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Generic acknowledgement"),
    ),
    tag = "Users"
)]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = auth_service::reset_password_request(&state.pool, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(get, path = "/api/users/verify-token", security(("bearer_auth" = [])), tag = "Users")]
pub async fn verify_token(user: AuthUser) -> Json<ApiResponse<VerifyTokenResponse>> {
    Json(ApiResponse::success(
        "Token valid",
        VerifyTokenResponse {
            valid: true,
            user_id: user.user_id,
            role: user.role,
        },
        Some(Meta::empty()),
    ))
}

#[utoipa::path(
    post,
    path = "/api/users/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New token pair", body = ApiResponse<TokenResponse>),
        (status = 401, description = "Invalid or expired refresh token"),
        (status = 404, description = "Subject user no longer exists"),
    ),
    tag = "Users"
)]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> AppResult<Json<ApiResponse<TokenResponse>>> {
    let resp = auth_service::refresh_tokens(&state.pool, payload).await?;
    Ok(Json(resp))
}
