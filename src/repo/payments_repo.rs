use crate::domain::order::OrderRecord;
use crate::domain::payment::{Payment, PaymentCondition};
use crate::repo::cart_repo::CartRepo;
use crate::repo::invoice_outbox_repo::InvoiceOutboxRepo;
use crate::repo::orders_repo::OrdersRepo;
use crate::repo::ports::{InvoicePayload, PaymentRepository};
use anyhow::{anyhow, Result};
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

#[derive(Clone)]
pub struct PaymentsRepo {
    pub pool: PgPool,
}

fn payment_from_row(row: &sqlx::postgres::PgRow) -> Result<Payment> {
    let condition: String = row.get("condition");
    Ok(Payment {
        payment_id: row.get("payment_id"),
        user_id: row.get("user_id"),
        amount_minor: row.get("amount_minor"),
        gateway_order_ref: row.get("gateway_order_ref"),
        gateway_payment_id: row.get("gateway_payment_id"),
        condition: PaymentCondition::parse(&condition)
            .ok_or_else(|| anyhow!("unknown payment condition `{condition}`"))?,
        created_at: row.get("created_at"),
    })
}

const PAYMENT_COLUMNS: &str =
    "payment_id, user_id, amount_minor, gateway_order_ref, gateway_payment_id, condition, created_at";

impl PaymentsRepo {
    async fn fetch_tx(tx: &mut Transaction<'_, Postgres>, payment_id: Uuid) -> Result<Payment> {
        let row = sqlx::query(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE payment_id = $1"
        ))
        .bind(payment_id)
        .fetch_one(tx.as_mut())
        .await?;

        payment_from_row(&row)
    }
}

#[async_trait::async_trait]
impl PaymentRepository for PaymentsRepo {
    async fn create(&self, payment: Payment) -> Result<Payment> {
        sqlx::query(
            r#"
            INSERT INTO payments (payment_id, user_id, amount_minor, gateway_order_ref, gateway_payment_id, condition, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(payment.payment_id)
        .bind(payment.user_id)
        .bind(payment.amount_minor)
        .bind(payment.gateway_order_ref.clone())
        .bind(payment.gateway_payment_id.clone())
        .bind(payment.condition.as_str())
        .bind(payment.created_at)
        .execute(&self.pool)
        .await?;

        Ok(payment)
    }

    async fn find_by_order_ref(&self, gateway_order_ref: &str) -> Result<Option<Payment>> {
        let row = sqlx::query(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE gateway_order_ref = $1"
        ))
        .bind(gateway_order_ref)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(payment_from_row).transpose()
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Payment>> {
        let rows = sqlx::query(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(payment_from_row).collect()
    }

    async fn delete_for_user(&self, user_id: Uuid) -> Result<u64> {
        let res = sqlx::query("DELETE FROM payments WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(res.rows_affected())
    }

    async fn transition_if_created(
        &self,
        payment_id: Uuid,
        user_id: Uuid,
        gateway_payment_id: &str,
        target: PaymentCondition,
    ) -> Result<Option<Vec<OrderRecord>>> {
        let mut tx = self.pool.begin().await?;

        // The row lock taken here serializes concurrent confirmations for
        // the same payment; exactly one caller sees rows_affected == 1.
        let res = sqlx::query(
            r#"
            UPDATE payments
            SET gateway_payment_id = $2, condition = $3
            WHERE payment_id = $1 AND condition = 'created'
            "#,
        )
        .bind(payment_id)
        .bind(gateway_payment_id)
        .bind(target.as_str())
        .execute(tx.as_mut())
        .await?;

        if res.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        if target != PaymentCondition::Paid {
            tx.commit().await?;
            return Ok(Some(Vec::new()));
        }

        let lines = CartRepo::lines_for_update_tx(&mut tx, user_id).await?;
        let mut orders = Vec::with_capacity(lines.len());
        for line in &lines {
            let order = OrderRecord::from_cart_line(payment_id, line);
            OrdersRepo::insert_tx(&mut tx, &order).await?;
            orders.push(order);
        }

        let line_ids: Vec<Uuid> = lines.iter().map(|l| l.cart_item_id).collect();
        CartRepo::delete_lines_tx(&mut tx, &line_ids).await?;

        let payment = Self::fetch_tx(&mut tx, payment_id).await?;
        let payload = serde_json::to_value(InvoicePayload {
            payment,
            orders: orders.clone(),
        })?;
        InvoiceOutboxRepo::enqueue_tx(&mut tx, payment_id, payload).await?;

        tx.commit().await?;
        Ok(Some(orders))
    }
}
