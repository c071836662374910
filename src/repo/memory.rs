use crate::domain::cart::CartItem;
use crate::domain::order::{OrderCondition, OrderRecord};
use crate::domain::payment::{Payment, PaymentCondition};
use crate::repo::ports::{
    CartRepository, InvoiceJob, InvoiceOutbox, InvoicePayload, OrderRepository, PaymentRepository,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct StoredJob {
    job: InvoiceJob,
    status: &'static str,
    next_attempt_at: DateTime<Utc>,
}

#[derive(Default)]
struct MemoryState {
    cart: Vec<CartItem>,
    payments: Vec<Payment>,
    orders: Vec<OrderRecord>,
    outbox: Vec<StoredJob>,
    next_job_id: i64,
}

/// In-memory implementation of every storage port, sharing one state map so
/// the paid transition stays atomic across entities. Backs the integration
/// tests; not wired into the production binary.
#[derive(Default, Clone)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every invoice job regardless of status, for test assertions.
    pub async fn invoice_jobs(&self) -> Vec<InvoiceJob> {
        let state = self.state.read().await;
        state.outbox.iter().map(|s| s.job.clone()).collect()
    }
}

#[async_trait::async_trait]
impl CartRepository for MemoryStore {
    async fn create(&self, item: CartItem) -> Result<CartItem> {
        let mut state = self.state.write().await;
        state.cart.push(item.clone());
        Ok(item)
    }

    async fn find_for_user(&self, user_id: Uuid) -> Result<Vec<CartItem>> {
        let state = self.state.read().await;
        Ok(state
            .cart
            .iter()
            .rev()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_owned(&self, user_id: Uuid, cart_item_id: Uuid) -> Result<Option<CartItem>> {
        let state = self.state.read().await;
        Ok(state
            .cart
            .iter()
            .find(|i| i.cart_item_id == cart_item_id && i.user_id == user_id)
            .cloned())
    }

    async fn update_quantity(
        &self,
        cart_item_id: Uuid,
        quantity: i32,
        line_total_minor: i64,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        if let Some(item) = state.cart.iter_mut().find(|i| i.cart_item_id == cart_item_id) {
            item.quantity = quantity;
            item.line_total_minor = line_total_minor;
        }
        Ok(())
    }

    async fn delete(&self, cart_item_id: Uuid) -> Result<()> {
        let mut state = self.state.write().await;
        state.cart.retain(|i| i.cart_item_id != cart_item_id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl PaymentRepository for MemoryStore {
    async fn create(&self, payment: Payment) -> Result<Payment> {
        let mut state = self.state.write().await;
        state.payments.push(payment.clone());
        Ok(payment)
    }

    async fn find_by_order_ref(&self, gateway_order_ref: &str) -> Result<Option<Payment>> {
        let state = self.state.read().await;
        Ok(state
            .payments
            .iter()
            .find(|p| p.gateway_order_ref == gateway_order_ref)
            .cloned())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Payment>> {
        let state = self.state.read().await;
        Ok(state
            .payments
            .iter()
            .rev()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete_for_user(&self, user_id: Uuid) -> Result<u64> {
        let mut state = self.state.write().await;
        let before = state.payments.len();
        state.payments.retain(|p| p.user_id != user_id);
        Ok((before - state.payments.len()) as u64)
    }

    async fn transition_if_created(
        &self,
        payment_id: Uuid,
        user_id: Uuid,
        gateway_payment_id: &str,
        target: PaymentCondition,
    ) -> Result<Option<Vec<OrderRecord>>> {
        // One write lock spans the whole unit, mirroring the Postgres
        // transaction: the CAS, the materialization, and the cart clear are
        // observed together or not at all.
        let mut state = self.state.write().await;

        let payment = match state
            .payments
            .iter_mut()
            .find(|p| p.payment_id == payment_id && p.condition == PaymentCondition::Created)
        {
            Some(p) => p,
            None => return Ok(None),
        };

        payment.gateway_payment_id = Some(gateway_payment_id.to_string());
        payment.condition = target;
        let payment = payment.clone();

        if target != PaymentCondition::Paid {
            return Ok(Some(Vec::new()));
        }

        let lines: Vec<CartItem> = state
            .cart
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect();

        let orders: Vec<OrderRecord> = lines
            .iter()
            .map(|line| OrderRecord::from_cart_line(payment_id, line))
            .collect();
        state.orders.extend(orders.iter().cloned());

        let line_ids: Vec<Uuid> = lines.iter().map(|l| l.cart_item_id).collect();
        state.cart.retain(|i| !line_ids.contains(&i.cart_item_id));

        if !state.outbox.iter().any(|s| s.job.payment_id == payment_id) {
            let id = state.next_job_id + 1;
            state.next_job_id = id;
            state.outbox.push(StoredJob {
                job: InvoiceJob {
                    id,
                    payment_id,
                    payload_json: serde_json::to_value(InvoicePayload {
                        payment,
                        orders: orders.clone(),
                    })?,
                    attempts: 0,
                },
                status: "PENDING",
                next_attempt_at: Utc::now(),
            });
        }

        Ok(Some(orders))
    }
}

#[async_trait::async_trait]
impl OrderRepository for MemoryStore {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<OrderRecord>> {
        let state = self.state.read().await;
        Ok(state
            .orders
            .iter()
            .rev()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_owned(&self, user_id: Uuid, order_id: Uuid) -> Result<Option<OrderRecord>> {
        let state = self.state.read().await;
        Ok(state
            .orders
            .iter()
            .find(|o| o.order_id == order_id && o.user_id == user_id)
            .cloned())
    }

    async fn set_condition(&self, order_id: Uuid, condition: OrderCondition) -> Result<()> {
        let mut state = self.state.write().await;
        if let Some(order) = state.orders.iter_mut().find(|o| o.order_id == order_id) {
            order.condition = condition;
        }
        Ok(())
    }

    async fn delete(&self, order_id: Uuid) -> Result<()> {
        let mut state = self.state.write().await;
        state.orders.retain(|o| o.order_id != order_id);
        Ok(())
    }

    async fn delete_for_user(&self, user_id: Uuid) -> Result<u64> {
        let mut state = self.state.write().await;
        let before = state.orders.len();
        state.orders.retain(|o| o.user_id != user_id);
        Ok((before - state.orders.len()) as u64)
    }
}

#[async_trait::async_trait]
impl InvoiceOutbox for MemoryStore {
    async fn lock_pending(&self, batch_size: i64) -> Result<Vec<InvoiceJob>> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let mut batch = Vec::new();
        for stored in state.outbox.iter_mut() {
            if batch.len() as i64 >= batch_size {
                break;
            }
            if stored.status == "PENDING" && stored.next_attempt_at <= now {
                stored.status = "PROCESSING";
                batch.push(stored.job.clone());
            }
        }
        Ok(batch)
    }

    async fn mark_published(&self, id: i64) -> Result<()> {
        let mut state = self.state.write().await;
        if let Some(stored) = state.outbox.iter_mut().find(|s| s.job.id == id) {
            stored.status = "PUBLISHED";
        }
        Ok(())
    }

    async fn mark_retry(
        &self,
        id: i64,
        attempts: i32,
        next_attempt_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        if let Some(stored) = state.outbox.iter_mut().find(|s| s.job.id == id) {
            stored.status = "PENDING";
            stored.job.attempts = attempts;
            stored.next_attempt_at = next_attempt_at;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cart::NewCartItem;

    fn seed_item(user_id: Uuid, total: i64) -> CartItem {
        CartItem::new(
            user_id,
            NewCartItem {
                title: "Mug".to_string(),
                line_total_minor: total,
                quantity: 1,
                image_ref: None,
            },
        )
    }

    #[tokio::test]
    async fn cart_lookups_are_scoped_to_the_owner() {
        let store = MemoryStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let item = CartRepository::create(&store, seed_item(alice, 500)).await.unwrap();

        assert!(CartRepository::find_owned(&store, alice, item.cart_item_id)
            .await
            .unwrap()
            .is_some());
        assert!(CartRepository::find_owned(&store, bob, item.cart_item_id)
            .await
            .unwrap()
            .is_none());
        assert_eq!(CartRepository::find_for_user(&store, bob).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn losing_the_transition_race_touches_nothing() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        CartRepository::create(&store, seed_item(user, 500)).await.unwrap();

        let payment = PaymentRepository::create(
            &store,
            Payment::open(user, 500, "ref_1".to_string()),
        )
        .await
        .unwrap();

        let won = store
            .transition_if_created(payment.payment_id, user, "pay_1", PaymentCondition::Paid)
            .await
            .unwrap();
        assert_eq!(won.map(|o| o.len()), Some(1));

        let lost = store
            .transition_if_created(payment.payment_id, user, "pay_2", PaymentCondition::Failed)
            .await
            .unwrap();
        assert!(lost.is_none());

        let stored = store.find_by_order_ref("ref_1").await.unwrap().unwrap();
        assert_eq!(stored.condition, PaymentCondition::Paid);
        assert_eq!(stored.gateway_payment_id.as_deref(), Some("pay_1"));
        assert_eq!(store.invoice_jobs().await.len(), 1);
    }
}
