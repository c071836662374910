use thiserror::Error;
use uuid::Uuid;

pub mod mock;
pub mod razorpay;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("gateway rejected request: HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("gateway response missing `{0}`")]
    MalformedResponse(&'static str),
}

/// Remote order opened at the provider. Its reference is the join key
/// between the local payment row and the confirmation callback.
#[derive(Debug, Clone)]
pub struct RemoteOrder {
    pub order_ref: String,
}

/// Provider-hosted URL the buyer is redirected to.
#[derive(Debug, Clone)]
pub struct PaymentLink {
    pub url: String,
}

#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync {
    fn name(&self) -> &'static str;

    async fn create_remote_order(
        &self,
        amount_minor: i64,
        currency: &str,
        user_id: Uuid,
    ) -> Result<RemoteOrder, GatewayError>;

    async fn create_payment_link(
        &self,
        order_ref: &str,
        amount_minor: i64,
        description: &str,
    ) -> Result<PaymentLink, GatewayError>;
}
