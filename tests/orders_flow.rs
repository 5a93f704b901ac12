use brybell_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::orders::{
        CreateOrderRequest, OrderItemRequest, OrderStatusUpdateRequest, PaymentStatusUpdateRequest,
    },
    error::AppError,
    es::EsClient,
    routes::params::{OrderListQuery, Pagination},
    services::order_service,
    state::AppState,
};
use sea_orm::{ConnectionTrait, Statement};

// Integration flow over a live Postgres: create -> pay -> cancel guards ->
// tracking lookup -> stats. Skipped when no database is configured.
#[tokio::test]
async fn order_lifecycle_flow() -> anyhow::Result<()> {
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

    let state = setup_state(&database_url).await?;

    // Create: total fixed at creation as sum(price x quantity).
    let created = order_service::create_order(
        &state,
        CreateOrderRequest {
            user_id: 1,
            items: vec![
                item(101, "Widget", 2, 10.0),
                item(102, "Gadget", 1, 5.5),
            ],
            shipping_address: "1 Test Street".into(),
            phone_number: "+15550100".into(),
        },
    )
    .await?
    .data
    .unwrap();

    let order = created.order;
    assert_eq!(order.total_amount, 25.5);
    assert_eq!(order.status, "pending");
    assert_eq!(order.payment_status, "pending");
    assert!(order.tracking_number.starts_with("BRY"));
    assert_eq!(created.items.len(), 2);

    // Empty item list never reaches the store.
    let err = order_service::create_order(
        &state,
        CreateOrderRequest {
            user_id: 1,
            items: vec![],
            shipping_address: "1 Test Street".into(),
            phone_number: "+15550100".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // Paid while pending auto-advances to processing.
    let paid = order_service::update_payment_status(
        &state,
        order.id,
        PaymentStatusUpdateRequest {
            payment_status: "paid".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(paid.payment_status, "paid");
    assert_eq!(paid.status, "processing");

    // Paid again while processing leaves the status alone.
    let paid_again = order_service::update_payment_status(
        &state,
        order.id,
        PaymentStatusUpdateRequest {
            payment_status: "paid".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(paid_again.status, "processing");

    // Cancel is allowed from processing.
    let cancelled = order_service::cancel_order(&state, order.id).await?.data.unwrap();
    assert_eq!(cancelled.status, "cancelled");

    // ...but not from cancelled or completed.
    let err = order_service::cancel_order(&state, order.id).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));

    let second = order_service::create_order(
        &state,
        CreateOrderRequest {
            user_id: 1,
            items: vec![item(103, "Doodad", 1, 100.0)],
            shipping_address: "2 Test Street".into(),
            phone_number: "+15550101".into(),
        },
    )
    .await?
    .data
    .unwrap()
    .order;

    order_service::update_status(
        &state,
        second.id,
        OrderStatusUpdateRequest {
            status: "completed".into(),
        },
    )
    .await?;
    let err = order_service::cancel_order(&state, second.id).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));

    // Unknown status strings are rejected before touching the row.
    let err = order_service::update_status(
        &state,
        second.id,
        OrderStatusUpdateRequest {
            status: "teleported".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // Tracking lookup finds the order; a bogus number does not.
    let tracked = order_service::track_order(&state, &order.tracking_number)
        .await?
        .data
        .unwrap();
    assert_eq!(tracked.order.id, order.id);
    let err = order_service::track_order(&state, "BRY0000")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    // User listing is newest-first.
    let listed = order_service::list_user_orders(
        &state,
        1,
        Pagination {
            skip: None,
            limit: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(listed.items.len(), 2);
    assert!(listed.items[0].created_at >= listed.items[1].created_at);

    // Status filter on the global listing.
    let completed_only = order_service::list_orders(
        &state,
        OrderListQuery {
            skip: None,
            limit: None,
            status: Some("completed".into()),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(completed_only.items.len(), 1);
    assert_eq!(completed_only.items[0].id, second.id);

    // Pay the second order so revenue counts it; the first is cancelled but
    // paid, and revenue follows payment_status alone.
    order_service::update_payment_status(
        &state,
        second.id,
        PaymentStatusUpdateRequest {
            payment_status: "paid".into(),
        },
    )
    .await?;

    let stats = order_service::order_stats(&state).await?.data.unwrap();
    assert_eq!(stats.total_orders, 2);
    assert_eq!(stats.pending_orders, 0);
    assert_eq!(stats.completed_orders, 1);
    assert_eq!(stats.total_revenue, 125.5);

    Ok(())
}

fn item(product_id: i64, name: &str, quantity: i32, price: f64) -> OrderItemRequest {
    OrderItemRequest {
        product_id,
        product_name: name.into(),
        quantity,
        price,
    }
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&pool).await?;

    // Clean tables between runs.
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
