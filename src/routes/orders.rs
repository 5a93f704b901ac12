use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};

use crate::{
    dto::orders::{
        CreateOrderRequest, OrderList, OrderStats, OrderStatusUpdateRequest, OrderWithItems,
        PaymentStatusUpdateRequest,
    },
    error::AppResult,
    models::Order,
    response::ApiResponse,
    routes::params::{OrderListQuery, Pagination},
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order).get(list_orders))
        .route("/{id}", get(get_order).delete(cancel_order))
        .route("/{id}/status", put(update_status))
        .route("/{id}/payment-status", put(update_payment_status))
        .route("/user/{user_id}", get(list_user_orders))
        .route("/tracking/{tracking_number}", get(track_order))
        .route("/stats/summary", get(order_stats))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = ApiResponse<OrderWithItems>),
        (status = 422, description = "Invalid order body"),
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<OrderWithItems>>)> {
    let resp = order_service::create_order(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Get order", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::get_order(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/user/{user_id}",
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("skip" = Option<i64>, Query, description = "Rows to skip, default 0"),
        ("limit" = Option<i64>, Query, description = "Page size, default 20"),
    ),
    responses(
        (status = 200, description = "Orders for a user, newest first", body = ApiResponse<OrderList>),
    ),
    tag = "Orders"
)]
pub async fn list_user_orders(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_user_orders(&state, user_id, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("skip" = Option<i64>, Query, description = "Rows to skip, default 0"),
        ("limit" = Option<i64>, Query, description = "Page size, default 50"),
    ),
    responses(
        (status = 200, description = "All orders, newest first", body = ApiResponse<OrderList>),
    ),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_orders(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/status",
    params(("id" = i64, Path, description = "Order ID")),
    request_body = OrderStatusUpdateRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<Order>),
        (status = 404, description = "Order not found"),
        (status = 422, description = "Unknown status"),
    ),
    tag = "Orders"
)]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdateRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::update_status(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/payment-status",
    params(("id" = i64, Path, description = "Order ID")),
    request_body = PaymentStatusUpdateRequest,
    responses(
        (status = 200, description = "Payment status updated", body = ApiResponse<Order>),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn update_payment_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<PaymentStatusUpdateRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::update_payment_status(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order cancelled", body = ApiResponse<Order>),
        (status = 400, description = "Order not cancellable in current status"),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn cancel_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::cancel_order(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/tracking/{tracking_number}",
    params(("tracking_number" = String, Path, description = "Tracking number")),
    responses(
        (status = 200, description = "Order for tracking number", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn track_order(
    State(state): State<AppState>,
    Path(tracking_number): Path<String>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::track_order(&state, &tracking_number).await?;
    Ok(Json(resp))
}

#[utoipa::path(get, path = "/api/orders/stats/summary", tag = "Orders")]
pub async fn order_stats(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<OrderStats>>> {
    let resp = order_service::order_stats(&state).await?;
    Ok(Json(resp))
}
