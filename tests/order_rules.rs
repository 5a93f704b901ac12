use std::collections::HashSet;

use brybell_api::dto::orders::OrderItemRequest;
use brybell_api::error::AppError;
use brybell_api::models::{OrderStatus, PaymentStatus};
use brybell_api::services::order_service::{
    generate_tracking_number, order_total, payment_transition, validate_items,
};

fn item(product_id: i64, quantity: i32, price: f64) -> OrderItemRequest {
    OrderItemRequest {
        product_id,
        product_name: format!("product-{product_id}"),
        quantity,
        price,
    }
}

#[test]
fn total_is_sum_of_price_times_quantity() {
    let items = vec![item(1, 2, 10.0), item(2, 1, 5.5)];
    assert_eq!(order_total(&items), 25.5);
}

#[test]
fn total_of_single_item() {
    assert_eq!(order_total(&[item(7, 3, 19.99)]), 59.97);
}

#[test]
fn tracking_numbers_are_prefixed_uppercase_hex() {
    let tracking = generate_tracking_number();
    assert!(tracking.starts_with("BRY"));
    assert_eq!(tracking.len(), 3 + 32);
    assert!(
        tracking[3..]
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
    );
}

#[test]
fn tracking_numbers_do_not_collide_over_ten_thousand_samples() {
    let mut seen = HashSet::new();
    for _ in 0..10_000 {
        assert!(seen.insert(generate_tracking_number()));
    }
}

#[test]
fn empty_item_list_is_rejected() {
    let err = validate_items(&[]).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[test]
fn zero_quantity_is_rejected() {
    let err = validate_items(&[item(1, 0, 10.0)]).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[test]
fn negative_price_is_rejected() {
    let err = validate_items(&[item(1, 1, -0.01)]).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[test]
fn valid_items_pass() {
    assert!(validate_items(&[item(1, 1, 0.0), item(2, 5, 12.5)]).is_ok());
}

#[test]
fn paid_while_pending_advances_to_processing() {
    assert_eq!(
        payment_transition(OrderStatus::Pending, PaymentStatus::Paid),
        OrderStatus::Processing
    );
}

#[test]
fn paid_while_processing_leaves_status_unchanged() {
    assert_eq!(
        payment_transition(OrderStatus::Processing, PaymentStatus::Paid),
        OrderStatus::Processing
    );
}

#[test]
fn non_paid_payment_never_advances() {
    assert_eq!(
        payment_transition(OrderStatus::Pending, PaymentStatus::Failed),
        OrderStatus::Pending
    );
    assert_eq!(
        payment_transition(OrderStatus::Completed, PaymentStatus::Refunded),
        OrderStatus::Completed
    );
}

#[test]
fn cancellation_is_only_allowed_before_completion() {
    assert!(OrderStatus::Pending.cancellable());
    assert!(OrderStatus::Processing.cancellable());
    assert!(!OrderStatus::Completed.cancellable());
    assert!(!OrderStatus::Cancelled.cancellable());
}

#[test]
fn status_strings_round_trip() {
    for status in [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ] {
        assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
    }
    assert!("shipped".parse::<OrderStatus>().is_err());
}
