use crate::gateways::{GatewayError, PaymentGateway, PaymentLink, RemoteOrder};
use serde_json::json;
use uuid::Uuid;

pub struct RazorpayGateway {
    pub base_url: String,
    pub key_id: String,
    pub key_secret: String,
    pub timeout_ms: u64,
    pub callback_url: String,
    pub client: reqwest::Client,
}

impl RazorpayGateway {
    async fn post_json(
        &self,
        url: String,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, GatewayError> {
        let resp = self
            .client
            .post(url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&body)
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        Ok(resp.json().await?)
    }
}

#[async_trait::async_trait]
impl PaymentGateway for RazorpayGateway {
    fn name(&self) -> &'static str {
        "razorpay"
    }

    async fn create_remote_order(
        &self,
        amount_minor: i64,
        currency: &str,
        user_id: Uuid,
    ) -> Result<RemoteOrder, GatewayError> {
        let body = json!({
            "amount": amount_minor,
            "currency": currency,
            "receipt": format!("u_{}", user_id),
            "notes": { "user_id": user_id },
            "payment_capture": 1
        });

        let v = self.post_json(format!("{}/v1/orders", self.base_url), body).await?;
        let order_ref = v
            .get("id")
            .and_then(|id| id.as_str())
            .ok_or(GatewayError::MalformedResponse("order id"))?;

        Ok(RemoteOrder {
            order_ref: order_ref.to_string(),
        })
    }

    async fn create_payment_link(
        &self,
        order_ref: &str,
        amount_minor: i64,
        description: &str,
    ) -> Result<PaymentLink, GatewayError> {
        let body = json!({
            "amount": amount_minor,
            "currency": "INR",
            "accept_partial": false,
            "reference_id": order_ref,
            "description": description,
            "notify": { "sms": true, "email": true },
            "reminder_enable": true,
            "callback_url": self.callback_url,
            "callback_method": "get"
        });

        let v = self
            .post_json(format!("{}/v1/payment_links", self.base_url), body)
            .await?;
        let url = v
            .get("short_url")
            .and_then(|u| u.as_str())
            .ok_or(GatewayError::MalformedResponse("short_url"))?;

        Ok(PaymentLink { url: url.to_string() })
    }
}
