use crate::gateways::{GatewayError, PaymentGateway, PaymentLink, RemoteOrder};
use uuid::Uuid;

pub struct MockGateway {
    pub behavior: String,
}

impl MockGateway {
    pub fn always_success() -> Self {
        Self {
            behavior: "ALWAYS_SUCCESS".to_string(),
        }
    }

    fn refuse(&self) -> Option<GatewayError> {
        match self.behavior.as_str() {
            "ALWAYS_FAILURE" => Some(GatewayError::Rejected {
                status: 401,
                body: "mock auth failure".to_string(),
            }),
            _ => None,
        }
    }
}

#[async_trait::async_trait]
impl PaymentGateway for MockGateway {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn create_remote_order(
        &self,
        _amount_minor: i64,
        _currency: &str,
        _user_id: Uuid,
    ) -> Result<RemoteOrder, GatewayError> {
        if let Some(err) = self.refuse() {
            return Err(err);
        }

        Ok(RemoteOrder {
            order_ref: format!("order_mock_{}", Uuid::new_v4().simple()),
        })
    }

    async fn create_payment_link(
        &self,
        order_ref: &str,
        _amount_minor: i64,
        _description: &str,
    ) -> Result<PaymentLink, GatewayError> {
        if let Some(err) = self.refuse() {
            return Err(err);
        }

        Ok(PaymentLink {
            url: format!("https://mock.gateway/pay/{order_ref}"),
        })
    }
}
