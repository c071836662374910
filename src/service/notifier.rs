use crate::repo::ports::InvoicePayload;
use anyhow::Result;

/// Invoice rendering and email delivery live in an external service; this
/// side of the seam only hands the payload over.
#[async_trait::async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn send_invoice(&self, payload: &InvoicePayload) -> Result<()>;
}

pub struct HttpInvoiceNotifier {
    pub target_url: String,
    pub secret: Option<String>,
    pub client: reqwest::Client,
}

#[async_trait::async_trait]
impl NotificationDispatcher for HttpInvoiceNotifier {
    async fn send_invoice(&self, payload: &InvoicePayload) -> Result<()> {
        let mut req = self
            .client
            .post(&self.target_url)
            .header("Content-Type", "application/json")
            .header("X-Event-Type", "invoice.requested")
            .json(payload);
        if let Some(secret) = &self.secret {
            req = req.header("X-Notify-Secret", secret);
        }

        let resp = req.send().await?;
        if !resp.status().is_success() {
            anyhow::bail!("notification endpoint returned HTTP {}", resp.status());
        }

        Ok(())
    }
}
