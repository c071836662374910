mod common;

use checkout_service::domain::payment::PaymentCondition;
use checkout_service::error::ApiError;
use checkout_service::gateways::mock::MockGateway;
use checkout_service::repo::ports::{CartRepository, PaymentRepository};
use uuid::Uuid;

#[tokio::test]
async fn empty_cart_is_rejected_and_no_payment_row_is_created() {
    let w = common::world();
    let user = Uuid::new_v4();

    let err = w.checkout.start_checkout(user).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let payments = PaymentRepository::list_for_user(&w.store, user).await.unwrap();
    assert!(payments.is_empty());
}

#[tokio::test]
async fn aggregate_sums_stored_line_totals() {
    let w = common::world();
    let user = Uuid::new_v4();
    common::seed_line(&w.store, user, "Mug", 500, 1).await;
    common::seed_line(&w.store, user, "Poster", 1200, 2).await;

    let summary = w.checkout.aggregate(user).await.unwrap();
    assert_eq!(summary.total_minor, 1700);
    assert_eq!(summary.items.len(), 2);
}

#[tokio::test]
async fn checkout_opens_a_created_payment_for_the_cart_total() {
    let w = common::world();
    let user = Uuid::new_v4();
    common::seed_line(&w.store, user, "Mug", 500, 1).await;
    common::seed_line(&w.store, user, "Poster", 1200, 2).await;

    let session = w.checkout.start_checkout(user).await.unwrap();

    assert_eq!(session.total_minor, 1700);
    assert_eq!(session.payment.amount_minor, 1700);
    assert_eq!(session.payment.condition, PaymentCondition::Created);
    assert_eq!(session.payment.user_id, user);
    assert!(session.payment.gateway_payment_id.is_none());
    assert!(session
        .payment_link_url
        .contains(&session.payment.gateway_order_ref));

    // the callback can already find the row by order reference
    let stored = w
        .store
        .find_by_order_ref(&session.payment.gateway_order_ref)
        .await
        .unwrap();
    assert!(stored.is_some());

    // cart stays mutable until confirmation
    let cart = CartRepository::find_for_user(&w.store, user).await.unwrap();
    assert_eq!(cart.len(), 2);
}

#[tokio::test]
async fn gateway_refusal_surfaces_and_persists_nothing() {
    let w = common::world_with_gateway(MockGateway {
        behavior: "ALWAYS_FAILURE".to_string(),
    });
    let user = Uuid::new_v4();
    common::seed_line(&w.store, user, "Mug", 500, 1).await;

    let err = w.checkout.start_checkout(user).await.unwrap_err();
    assert!(matches!(err, ApiError::Gateway(_)));

    let payments = PaymentRepository::list_for_user(&w.store, user).await.unwrap();
    assert!(payments.is_empty());
}
