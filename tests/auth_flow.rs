use brybell_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::auth::{
        LoginRequest, RefreshRequest, RegisterRequest, ResetPasswordRequest, TokenType,
        UpdateProfileRequest,
    },
    error::AppError,
    es::EsClient,
    services::auth_service,
    state::AppState,
};
use sea_orm::{ConnectionTrait, Statement};

// Integration flow over a live Postgres: register -> conflicts -> login ->
// refresh rotation -> profile. Skipped when no database is configured.
#[tokio::test]
async fn register_login_refresh_flow() -> anyhow::Result<()> {
    let database_url =
        match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
            Ok(url) => url,
            Err(_) => {
                eprintln!(
                    "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
                );
                return Ok(());
            }
        };

    // SAFETY: tests in this file run single-threaded before any other thread
    // reads the variable.
    unsafe { std::env::set_var("JWT_SECRET", "integration-test-secret") };

    let state = setup_state(&database_url).await?;
    let secret = auth_service::jwt_secret()?;

    let registered = auth_service::register_user(
        &state.pool,
        register_request("ada@example.com", "+15550200"),
    )
    .await?
    .data
    .unwrap();
    assert_eq!(registered.user.email, "ada@example.com");
    assert_eq!(registered.user.role, "customer");
    assert_eq!(registered.token_type, "bearer");

    // Both tokens of the pair verify with their own type.
    let access_claims =
        auth_service::verify_token(&secret, &registered.access_token, TokenType::Access)?;
    assert_eq!(access_claims.sub, registered.user.id);
    auth_service::verify_token(&secret, &registered.refresh_token, TokenType::Refresh)?;

    // Duplicate email and duplicate phone both conflict, and neither writes.
    let err = auth_service::register_user(
        &state.pool,
        register_request("ada@example.com", "+15550299"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = auth_service::register_user(
        &state.pool,
        register_request("someone-else@example.com", "+15550200"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let count: (i64,) = sqlx::query_as("SELECT count(*) FROM users")
        .fetch_one(&state.pool)
        .await?;
    assert_eq!(count.0, 1);

    // Wrong password and unknown email are indistinguishable.
    let wrong_password = auth_service::login_user(
        &state.pool,
        LoginRequest {
            email: "ada@example.com".into(),
            password: "not-the-password".into(),
        },
    )
    .await
    .unwrap_err();
    let unknown_email = auth_service::login_user(
        &state.pool,
        LoginRequest {
            email: "nobody@example.com".into(),
            password: "hunter2".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(wrong_password, AppError::Unauthorized));
    assert!(matches!(unknown_email, AppError::Unauthorized));
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());

    let logged_in = auth_service::login_user(
        &state.pool,
        LoginRequest {
            email: "ada@example.com".into(),
            password: "correct horse".into(),
        },
    )
    .await?
    .data
    .unwrap();

    // Rotation: the refreshed pair's access token verifies.
    let rotated = auth_service::refresh_tokens(
        &state.pool,
        RefreshRequest {
            refresh_token: logged_in.refresh_token.clone(),
        },
    )
    .await?
    .data
    .unwrap();
    let claims = auth_service::verify_token(&secret, &rotated.access_token, TokenType::Access)?;
    assert_eq!(claims.sub, logged_in.user.id);

    // An access token is not accepted by the refresh endpoint.
    let err = auth_service::refresh_tokens(
        &state.pool,
        RefreshRequest {
            refresh_token: logged_in.access_token.clone(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));

    // Partial profile update merges only supplied fields.
    let updated = auth_service::update_profile(
        &state.pool,
        logged_in.user.id,
        UpdateProfileRequest {
            first_name: Some("Ada".into()),
            last_name: None,
            phone: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(updated.first_name, "Ada");
    assert_eq!(updated.last_name, "Lovelace");
    assert_eq!(updated.phone, "+15550200");

    // Password reset acknowledgement does not leak account existence.
    let existing = auth_service::reset_password_request(
        &state.pool,
        ResetPasswordRequest {
            email: "ada@example.com".into(),
        },
    )
    .await?;
    let missing = auth_service::reset_password_request(
        &state.pool,
        ResetPasswordRequest {
            email: "nobody@example.com".into(),
        },
    )
    .await?;
    assert_eq!(existing.message, missing.message);

    Ok(())
}

fn register_request(email: &str, phone: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.into(),
        phone: phone.into(),
        password: "correct horse".into(),
        first_name: "Augusta".into(),
        last_name: "Lovelace".into(),
    }
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&pool).await?;

    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE order_items, orders, products, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(AppState {
        pool,
        orm,
        es: EsClient::new("http://localhost:9200"),
    })
}
