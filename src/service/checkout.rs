use crate::domain::cart::CartSummary;
use crate::domain::payment::Payment;
use crate::error::ApiError;
use crate::gateways::PaymentGateway;
use crate::repo::ports::{CartRepository, PaymentRepository};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutSession {
    pub payment_link_url: String,
    pub total_minor: i64,
    pub payment: Payment,
}

#[derive(Clone)]
pub struct CheckoutService {
    pub cart_repo: Arc<dyn CartRepository>,
    pub payments_repo: Arc<dyn PaymentRepository>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub currency: String,
}

impl CheckoutService {
    /// Read-only cart aggregation; safe to call repeatedly.
    pub async fn aggregate(&self, user_id: Uuid) -> Result<CartSummary, ApiError> {
        let items = self.cart_repo.find_for_user(user_id).await?;
        if items.is_empty() {
            return Err(ApiError::Validation("cart is empty".to_string()));
        }

        let total_minor = items.iter().map(|i| i.line_total_minor).sum();
        Ok(CartSummary { items, total_minor })
    }

    pub async fn start_checkout(&self, user_id: Uuid) -> Result<CheckoutSession, ApiError> {
        let summary = self.aggregate(user_id).await?;

        let remote = self
            .gateway
            .create_remote_order(summary.total_minor, &self.currency, user_id)
            .await?;
        let link = self
            .gateway
            .create_payment_link(
                &remote.order_ref,
                summary.total_minor,
                &format!("Payment for {} cart item(s)", summary.items.len()),
            )
            .await?;

        // The local row must exist before the buyer is redirected; the
        // confirmation callback looks it up by gateway_order_ref.
        let payment = self
            .payments_repo
            .create(Payment::open(user_id, summary.total_minor, remote.order_ref))
            .await?;

        tracing::info!(
            payment_id = %payment.payment_id,
            amount_minor = payment.amount_minor,
            gateway = self.gateway.name(),
            "checkout session opened"
        );

        Ok(CheckoutSession {
            payment_link_url: link.url,
            total_minor: summary.total_minor,
            payment,
        })
    }
}
