use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Order, OrderItem};

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderItemRequest {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub price: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub user_id: i64,
    pub items: Vec<OrderItemRequest>,
    pub shipping_address: String,
    pub phone_number: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderStatusUpdateRequest {
    pub status: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentStatusUpdateRequest {
    pub payment_status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

#[derive(Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct OrderStats {
    pub total_orders: i64,
    pub pending_orders: i64,
    pub processing_orders: i64,
    pub completed_orders: i64,
    pub total_revenue: f64,
}
