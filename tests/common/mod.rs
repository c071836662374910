#![allow(dead_code)]

use checkout_service::domain::cart::{CartItem, NewCartItem};
use checkout_service::domain::order::OrderRecord;
use checkout_service::gateways::mock::MockGateway;
use checkout_service::repo::memory::MemoryStore;
use checkout_service::repo::ports::{CartRepository, InvoicePayload};
use checkout_service::service::checkout::CheckoutService;
use checkout_service::service::notifier::NotificationDispatcher;
use checkout_service::service::orders::OrderService;
use checkout_service::service::verifier::{ConfirmParams, PaymentVerifier};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub struct World {
    pub store: MemoryStore,
    pub checkout: CheckoutService,
    pub verifier: PaymentVerifier,
    pub orders: OrderService,
}

pub fn world() -> World {
    world_with_gateway(MockGateway::always_success())
}

pub fn world_with_gateway(gateway: MockGateway) -> World {
    let store = MemoryStore::new();

    World {
        checkout: CheckoutService {
            cart_repo: Arc::new(store.clone()),
            payments_repo: Arc::new(store.clone()),
            gateway: Arc::new(gateway),
            currency: "INR".to_string(),
        },
        verifier: PaymentVerifier {
            payments_repo: Arc::new(store.clone()),
        },
        orders: OrderService {
            orders_repo: Arc::new(store.clone()),
        },
        store,
    }
}

pub async fn seed_line(
    store: &MemoryStore,
    user_id: Uuid,
    title: &str,
    line_total_minor: i64,
    quantity: i32,
) -> CartItem {
    CartRepository::create(
        store,
        CartItem::new(
            user_id,
            NewCartItem {
                title: title.to_string(),
                line_total_minor,
                quantity,
                image_ref: None,
            },
        ),
    )
    .await
    .unwrap()
}

pub fn confirm_params(gateway_payment_id: &str, order_ref: &str, status: &str) -> ConfirmParams {
    ConfirmParams {
        gateway_payment_id: Some(gateway_payment_id.to_string()),
        gateway_order_ref: Some(order_ref.to_string()),
        gateway_status: Some(status.to_string()),
    }
}

/// Runs the full pipeline for one user: seed lines, start checkout, confirm
/// paid. Returns the materialized orders, most recent first.
pub async fn place_paid_order(
    world: &World,
    user_id: Uuid,
    lines: &[(&str, i64, i32)],
) -> Vec<OrderRecord> {
    for (title, total, qty) in lines {
        seed_line(&world.store, user_id, title, *total, *qty).await;
    }

    let session = world.checkout.start_checkout(user_id).await.unwrap();
    let outcome = world
        .verifier
        .confirm(confirm_params(
            "pay_test",
            &session.payment.gateway_order_ref,
            "paid",
        ))
        .await
        .unwrap();
    assert!(outcome.success);

    world.orders.list(user_id).await.unwrap()
}

#[derive(Default, Clone)]
pub struct RecordingNotifier {
    pub sent: Arc<Mutex<Vec<InvoicePayload>>>,
}

#[async_trait::async_trait]
impl NotificationDispatcher for RecordingNotifier {
    async fn send_invoice(&self, payload: &InvoicePayload) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(payload.clone());
        Ok(())
    }
}

pub struct FailingNotifier;

#[async_trait::async_trait]
impl NotificationDispatcher for FailingNotifier {
    async fn send_invoice(&self, _payload: &InvoicePayload) -> anyhow::Result<()> {
        anyhow::bail!("notification endpoint returned HTTP 503")
    }
}
