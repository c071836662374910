use crate::repo::ports::{InvoiceJob, InvoiceOutbox};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

#[derive(Clone)]
pub struct InvoiceOutboxRepo {
    pub pool: PgPool,
}

impl InvoiceOutboxRepo {
    /// Enqueued in the same transaction that marks the payment paid; the
    /// unique key on payment_id keeps replays from producing a second job.
    pub async fn enqueue_tx(
        tx: &mut Transaction<'_, Postgres>,
        payment_id: Uuid,
        payload_json: serde_json::Value,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO invoice_outbox (payment_id, payload_json, status, attempts, next_attempt_at)
            VALUES ($1, $2, 'PENDING', 0, now())
            ON CONFLICT (payment_id) DO NOTHING
            "#,
        )
        .bind(payment_id)
        .bind(payload_json)
        .execute(tx.as_mut())
        .await?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl InvoiceOutbox for InvoiceOutboxRepo {
    async fn lock_pending(&self, batch_size: i64) -> Result<Vec<InvoiceJob>> {
        let mut tx = self.pool.begin().await?;
        let rows = sqlx::query(
            r#"
            SELECT id, payment_id, payload_json, attempts
            FROM invoice_outbox
            WHERE status = 'PENDING' AND next_attempt_at <= now()
            ORDER BY id ASC
            LIMIT $1
            FOR UPDATE SKIP LOCKED
            "#,
        )
        .bind(batch_size)
        .fetch_all(tx.as_mut())
        .await?;

        if rows.is_empty() {
            tx.rollback().await?;
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|r| r.get("id")).collect();
        sqlx::query("UPDATE invoice_outbox SET status = 'PROCESSING', updated_at = now() WHERE id = ANY($1)")
            .bind(&ids)
            .execute(tx.as_mut())
            .await?;

        tx.commit().await?;

        Ok(rows
            .into_iter()
            .map(|r| InvoiceJob {
                id: r.get("id"),
                payment_id: r.get("payment_id"),
                payload_json: r.get("payload_json"),
                attempts: r.get("attempts"),
            })
            .collect())
    }

    async fn mark_published(&self, id: i64) -> Result<()> {
        sqlx::query(
            "UPDATE invoice_outbox SET status = 'PUBLISHED', published_at = now(), updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn mark_retry(
        &self,
        id: i64,
        attempts: i32,
        next_attempt_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE invoice_outbox SET status = 'PENDING', attempts = $2, next_attempt_at = $3, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(attempts)
        .bind(next_attempt_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
