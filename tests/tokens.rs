use brybell_api::dto::auth::TokenType;
use brybell_api::error::AppError;
use brybell_api::services::auth_service::{
    create_access_token, create_refresh_token, create_token, verify_token,
};
use chrono::Duration;

const SECRET: &str = "unit-test-secret";

#[test]
fn access_token_round_trips() {
    let token = create_access_token(SECRET, 42, "customer").unwrap();
    let claims = verify_token(SECRET, &token, TokenType::Access).unwrap();
    assert_eq!(claims.sub, 42);
    assert_eq!(claims.role, "customer");
    assert_eq!(claims.token_type, TokenType::Access);
}

#[test]
fn refresh_token_is_rejected_where_access_is_required() {
    let refresh = create_refresh_token(SECRET, 42, "customer").unwrap();
    let err = verify_token(SECRET, &refresh, TokenType::Access).unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));
}

#[test]
fn access_token_is_rejected_where_refresh_is_required() {
    let access = create_access_token(SECRET, 42, "customer").unwrap();
    let err = verify_token(SECRET, &access, TokenType::Refresh).unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));
}

#[test]
fn expired_token_is_rejected() {
    // Well past the decoder's default leeway.
    let token = create_token(
        SECRET,
        42,
        "customer",
        TokenType::Access,
        Duration::minutes(-10),
    )
    .unwrap();
    let err = verify_token(SECRET, &token, TokenType::Access).unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));
}

#[test]
fn token_signed_with_other_secret_is_rejected() {
    let token = create_access_token("other-secret", 42, "customer").unwrap();
    let err = verify_token(SECRET, &token, TokenType::Access).unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));
}

#[test]
fn rotated_pair_yields_a_verifiable_access_token() {
    let refresh = create_refresh_token(SECRET, 7, "admin").unwrap();
    let claims = verify_token(SECRET, &refresh, TokenType::Refresh).unwrap();

    // Rotation: issue a fresh pair for the refresh token's subject.
    let new_access = create_access_token(SECRET, claims.sub, &claims.role).unwrap();
    let new_refresh = create_refresh_token(SECRET, claims.sub, &claims.role).unwrap();

    let access_claims = verify_token(SECRET, &new_access, TokenType::Access).unwrap();
    assert_eq!(access_claims.sub, 7);
    assert_eq!(access_claims.role, "admin");
    assert!(verify_token(SECRET, &new_refresh, TokenType::Refresh).is_ok());
}
