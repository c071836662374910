use crate::domain::cart::CartItem;
use crate::domain::order::{OrderCondition, OrderRecord};
use crate::domain::payment::{Payment, PaymentCondition};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[async_trait::async_trait]
pub trait CartRepository: Send + Sync {
    async fn create(&self, item: CartItem) -> Result<CartItem>;
    async fn find_for_user(&self, user_id: Uuid) -> Result<Vec<CartItem>>;
    async fn find_owned(&self, user_id: Uuid, cart_item_id: Uuid) -> Result<Option<CartItem>>;
    async fn update_quantity(
        &self,
        cart_item_id: Uuid,
        quantity: i32,
        line_total_minor: i64,
    ) -> Result<()>;
    async fn delete(&self, cart_item_id: Uuid) -> Result<()>;
}

#[async_trait::async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn create(&self, payment: Payment) -> Result<Payment>;
    async fn find_by_order_ref(&self, gateway_order_ref: &str) -> Result<Option<Payment>>;
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Payment>>;
    async fn delete_for_user(&self, user_id: Uuid) -> Result<u64>;

    /// Compare-and-swap `created -> target`, recording the gateway payment id.
    ///
    /// When the target is `paid`, the same atomic unit re-reads the user's
    /// current cart lines, materializes one order per line, deletes exactly
    /// those lines, and enqueues the invoice job. `Some(orders)` means this
    /// call performed the transition (empty for `failed`); `None` means the
    /// payment had already left `created` and nothing was touched.
    async fn transition_if_created(
        &self,
        payment_id: Uuid,
        user_id: Uuid,
        gateway_payment_id: &str,
        target: PaymentCondition,
    ) -> Result<Option<Vec<OrderRecord>>>;
}

#[async_trait::async_trait]
pub trait OrderRepository: Send + Sync {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<OrderRecord>>;
    async fn find_owned(&self, user_id: Uuid, order_id: Uuid) -> Result<Option<OrderRecord>>;
    async fn set_condition(&self, order_id: Uuid, condition: OrderCondition) -> Result<()>;
    async fn delete(&self, order_id: Uuid) -> Result<()>;
    async fn delete_for_user(&self, user_id: Uuid) -> Result<u64>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceJob {
    pub id: i64,
    pub payment_id: Uuid,
    pub payload_json: serde_json::Value,
    pub attempts: i32,
}

/// What the notification side channel delivers for one paid payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoicePayload {
    pub payment: Payment,
    pub orders: Vec<OrderRecord>,
}

#[async_trait::async_trait]
pub trait InvoiceOutbox: Send + Sync {
    async fn lock_pending(&self, batch_size: i64) -> Result<Vec<InvoiceJob>>;
    async fn mark_published(&self, id: i64) -> Result<()>;
    async fn mark_retry(&self, id: i64, attempts: i32, next_attempt_at: DateTime<Utc>)
        -> Result<()>;
}
