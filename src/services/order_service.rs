use chrono::Utc;
use password_hash::rand_core::{OsRng, RngCore};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use crate::{
    dto::orders::{
        CreateOrderRequest, OrderItemRequest, OrderList, OrderStats, OrderStatusUpdateRequest,
        OrderWithItems, PaymentStatusUpdateRequest,
    },
    entity::{
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
        },
    },
    error::{AppError, AppResult},
    models::{Order, OrderItem, OrderStatus, PaymentStatus},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, Pagination},
    state::AppState,
};

/// Order total is fixed at creation time and never recomputed afterwards.
pub fn order_total(items: &[OrderItemRequest]) -> f64 {
    items
        .iter()
        .map(|item| item.price * f64::from(item.quantity))
        .sum()
}

/// 128 bits of OS randomness, hex-encoded uppercase behind a carrier prefix.
/// Uniqueness is probabilistic here; the UNIQUE column constraint is the
/// backstop.
pub fn generate_tracking_number() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    let hex: String = bytes.iter().map(|b| format!("{b:02X}")).collect();
    format!("BRY{hex}")
}

pub fn validate_items(items: &[OrderItemRequest]) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::Validation(
            "order must contain at least one item".to_string(),
        ));
    }
    for item in items {
        if item.quantity < 1 {
            return Err(AppError::Validation(format!(
                "quantity must be at least 1 for product {}",
                item.product_id
            )));
        }
        if item.price < 0.0 {
            return Err(AppError::Validation(format!(
                "price must be non-negative for product {}",
                item.product_id
            )));
        }
    }
    Ok(())
}

/// A successful payment moves a pending order into processing; any other
/// combination leaves the status untouched.
pub fn payment_transition(current: OrderStatus, payment: PaymentStatus) -> OrderStatus {
    if payment == PaymentStatus::Paid && current == OrderStatus::Pending {
        OrderStatus::Processing
    } else {
        current
    }
}

pub async fn create_order(
    state: &AppState,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    validate_items(&payload.items)?;
    let total_amount = order_total(&payload.items);

    let txn = state.orm.begin().await?;

    let order = OrderActive {
        id: NotSet,
        user_id: Set(payload.user_id),
        total_amount: Set(total_amount),
        status: Set(OrderStatus::Pending.to_string()),
        payment_status: Set(PaymentStatus::Pending.to_string()),
        shipping_address: Set(payload.shipping_address),
        phone_number: Set(payload.phone_number),
        tracking_number: Set(generate_tracking_number()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut items: Vec<OrderItem> = Vec::with_capacity(payload.items.len());
    for item in payload.items {
        let row = OrderItemActive {
            id: NotSet,
            order_id: Set(order.id),
            product_id: Set(item.product_id),
            product_name: Set(item.product_name),
            quantity: Set(item.quantity),
            price: Set(item.price),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        items.push(order_item_from_entity(row));
    }

    txn.commit().await?;

    tracing::info!(order_id = order.id, total = total_amount, "order created");

    Ok(ApiResponse::success(
        "Order created",
        OrderWithItems {
            order: order_from_entity(order),
            items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn get_order(state: &AppState, id: i64) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find_by_id(id).one(&state.orm).await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let items = load_items(state, order.id).await?;

    Ok(ApiResponse::success(
        "OK",
        OrderWithItems {
            order: order_from_entity(order),
            items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_user_orders(
    state: &AppState,
    user_id: i64,
    pagination: Pagination,
) -> AppResult<ApiResponse<OrderList>> {
    let (skip, limit) = pagination.normalize(20);

    let finder = Orders::find()
        .filter(OrderCol::UserId.eq(user_id))
        .order_by_desc(OrderCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .offset(skip as u64)
        .limit(limit as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        OrderList { items: orders },
        Some(Meta::new(skip, limit, total)),
    ))
}

pub async fn list_orders(
    state: &AppState,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (skip, limit) = query.pagination().normalize(50);

    let mut condition = Condition::all();
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let finder = Orders::find()
        .filter(condition)
        .order_by_desc(OrderCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .offset(skip as u64)
        .limit(limit as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        OrderList { items: orders },
        Some(Meta::new(skip, limit, total)),
    ))
}

pub async fn update_status(
    state: &AppState,
    id: i64,
    payload: OrderStatusUpdateRequest,
) -> AppResult<ApiResponse<Order>> {
    let status: OrderStatus = payload
        .status
        .parse()
        .map_err(|_| AppError::Validation(format!("unknown order status '{}'", payload.status)))?;

    let existing = Orders::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let mut active: OrderActive = existing.into();
    active.status = Set(status.to_string());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Order updated",
        order_from_entity(order),
        Some(Meta::empty()),
    ))
}

pub async fn update_payment_status(
    state: &AppState,
    id: i64,
    payload: PaymentStatusUpdateRequest,
) -> AppResult<ApiResponse<Order>> {
    let payment: PaymentStatus = payload.payment_status.parse().map_err(|_| {
        AppError::Validation(format!(
            "unknown payment status '{}'",
            payload.payment_status
        ))
    })?;

    let existing = Orders::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let current = existing.status.parse::<OrderStatus>();
    let mut active: OrderActive = existing.into();
    active.payment_status = Set(payment.to_string());
    if let Ok(current) = current {
        let next = payment_transition(current, payment);
        if next != current {
            active.status = Set(next.to_string());
        }
    }
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    tracing::info!(order_id = order.id, payment_status = %order.payment_status, "payment status updated");

    Ok(ApiResponse::success(
        "Payment status updated",
        order_from_entity(order),
        Some(Meta::empty()),
    ))
}

pub async fn cancel_order(state: &AppState, id: i64) -> AppResult<ApiResponse<Order>> {
    let existing = Orders::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let cancellable = existing
        .status
        .parse::<OrderStatus>()
        .map(OrderStatus::cancellable)
        .unwrap_or(false);
    if !cancellable {
        return Err(AppError::InvalidState(
            "Cannot cancel order in current status".to_string(),
        ));
    }

    let mut active: OrderActive = existing.into();
    active.status = Set(OrderStatus::Cancelled.to_string());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Order cancelled successfully",
        order_from_entity(order),
        Some(Meta::empty()),
    ))
}

pub async fn track_order(
    state: &AppState,
    tracking_number: &str,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find()
        .filter(OrderCol::TrackingNumber.eq(tracking_number))
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let items = load_items(state, order.id).await?;

    Ok(ApiResponse::success(
        "OK",
        OrderWithItems {
            order: order_from_entity(order),
            items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn order_stats(state: &AppState) -> AppResult<ApiResponse<OrderStats>> {
    let stats: OrderStats = sqlx::query_as(
        r#"
        SELECT count(*) AS total_orders,
               count(*) FILTER (WHERE status = 'pending') AS pending_orders,
               count(*) FILTER (WHERE status = 'processing') AS processing_orders,
               count(*) FILTER (WHERE status = 'completed') AS completed_orders,
               COALESCE(sum(total_amount) FILTER (WHERE payment_status = 'paid'), 0) AS total_revenue
        FROM orders
        "#,
    )
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::success("Stats", stats, Some(Meta::empty())))
}

async fn load_items(state: &AppState, order_id: i64) -> AppResult<Vec<OrderItem>> {
    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order_id))
        .order_by_asc(OrderItemCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();
    Ok(items)
}

fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        user_id: model.user_id,
        total_amount: model.total_amount,
        status: model.status,
        payment_status: model.payment_status,
        shipping_address: model.shipping_address,
        phone_number: model.phone_number,
        tracking_number: model.tracking_number,
        created_at: model.created_at.with_timezone(&chrono::Utc),
        updated_at: model.updated_at.with_timezone(&chrono::Utc),
    }
}

fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        product_name: model.product_name,
        quantity: model.quantity,
        price: model.price,
        created_at: model.created_at.with_timezone(&chrono::Utc),
    }
}
