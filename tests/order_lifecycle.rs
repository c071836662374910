mod common;

use checkout_service::domain::order::OrderCondition;
use checkout_service::error::ApiError;
use uuid::Uuid;

#[tokio::test]
async fn orders_list_most_recent_first() {
    let w = common::world();
    let user = Uuid::new_v4();

    common::place_paid_order(&w, user, &[("Mug", 500, 1)]).await;
    common::place_paid_order(&w, user, &[("Poster", 1200, 2)]).await;

    let orders = w.orders.list(user).await.unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].title, "Poster");
    assert_eq!(orders[1].title, "Mug");
}

#[tokio::test]
async fn cancel_transitions_paid_to_cancelled() {
    let w = common::world();
    let user = Uuid::new_v4();
    let orders = common::place_paid_order(&w, user, &[("Mug", 500, 1)]).await;

    let cancelled = w.orders.cancel(user, orders[0].order_id).await.unwrap();
    assert_eq!(cancelled.condition, OrderCondition::Cancelled);

    let listed = w.orders.list(user).await.unwrap();
    assert_eq!(listed[0].condition, OrderCondition::Cancelled);
}

#[tokio::test]
async fn re_cancel_is_an_idempotent_no_op() {
    let w = common::world();
    let user = Uuid::new_v4();
    let orders = common::place_paid_order(&w, user, &[("Mug", 500, 1)]).await;

    w.orders.cancel(user, orders[0].order_id).await.unwrap();
    let again = w.orders.cancel(user, orders[0].order_id).await.unwrap();
    assert_eq!(again.condition, OrderCondition::Cancelled);
}

#[tokio::test]
async fn cancelling_another_users_order_is_not_found_and_changes_nothing() {
    let w = common::world();
    let owner = Uuid::new_v4();
    let intruder = Uuid::new_v4();
    let orders = common::place_paid_order(&w, owner, &[("Mug", 500, 1)]).await;

    let err = w.orders.cancel(intruder, orders[0].order_id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let listed = w.orders.list(owner).await.unwrap();
    assert_eq!(listed[0].condition, OrderCondition::Paid);
}

#[tokio::test]
async fn deleting_another_users_order_is_not_found() {
    let w = common::world();
    let owner = Uuid::new_v4();
    let intruder = Uuid::new_v4();
    let orders = common::place_paid_order(&w, owner, &[("Mug", 500, 1)]).await;

    let err = w
        .orders
        .delete(intruder, Some(orders[0].order_id))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    assert_eq!(w.orders.list(owner).await.unwrap().len(), 1);
}

#[tokio::test]
async fn re_delete_of_a_deleted_order_is_not_found() {
    let w = common::world();
    let user = Uuid::new_v4();
    let orders = common::place_paid_order(&w, user, &[("Mug", 500, 1)]).await;

    let removed = w.orders.delete(user, Some(orders[0].order_id)).await.unwrap();
    assert_eq!(removed, 1);

    let err = w
        .orders
        .delete(user, Some(orders[0].order_id))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn delete_all_reports_the_count_removed() {
    let w = common::world();
    let user = Uuid::new_v4();
    common::place_paid_order(&w, user, &[("Mug", 500, 1), ("Poster", 1200, 2)]).await;

    let removed = w.orders.delete(user, None).await.unwrap();
    assert_eq!(removed, 2);
    assert!(w.orders.list(user).await.unwrap().is_empty());

    let removed_again = w.orders.delete(user, None).await.unwrap();
    assert_eq!(removed_again, 0);
}
