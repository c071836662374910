use crate::repo::ports::{InvoiceOutbox, InvoicePayload};
use crate::service::notifier::NotificationDispatcher;
use anyhow::Result;
use chrono::{Duration, Utc};
use std::sync::Arc;

/// Drains the invoice outbox to the notification dispatcher. Delivery is
/// best-effort with bounded backoff; nothing here can fail the confirmation
/// that enqueued the job.
#[derive(Clone)]
pub struct InvoiceRelay {
    pub outbox: Arc<dyn InvoiceOutbox>,
    pub notifier: Arc<dyn NotificationDispatcher>,
}

impl InvoiceRelay {
    pub async fn run(self) {
        loop {
            if let Err(err) = self.tick().await {
                tracing::error!("invoice relay error: {err:#}");
            }
            tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        }
    }

    pub async fn tick(&self) -> Result<()> {
        let batch = self.outbox.lock_pending(50).await?;
        for job in batch {
            let delivery = match serde_json::from_value::<InvoicePayload>(job.payload_json.clone())
            {
                Ok(payload) => self.notifier.send_invoice(&payload).await,
                Err(e) => Err(e.into()),
            };

            match delivery {
                Ok(()) => {
                    self.outbox.mark_published(job.id).await?;
                }
                Err(e) => {
                    let attempts = job.attempts + 1;
                    let backoff = i64::min(300, 2_i64.pow(attempts.min(8) as u32));
                    let next_attempt_at = Utc::now() + Duration::seconds(backoff);
                    self.outbox.mark_retry(job.id, attempts, next_attempt_at).await?;
                    tracing::warn!(
                        payment_id = %job.payment_id,
                        attempts,
                        "invoice delivery failed: {e:#}"
                    );
                }
            }
        }

        Ok(())
    }
}
