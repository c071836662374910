use crate::domain::order::{OrderCondition, OrderRecord};
use crate::repo::ports::OrderRepository;
use anyhow::{anyhow, Result};
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

#[derive(Clone)]
pub struct OrdersRepo {
    pub pool: PgPool,
}

fn order_from_row(row: &sqlx::postgres::PgRow) -> Result<OrderRecord> {
    let condition: String = row.get("condition");
    Ok(OrderRecord {
        order_id: row.get("order_id"),
        user_id: row.get("user_id"),
        payment_id: row.get("payment_id"),
        title: row.get("title"),
        line_total_minor: row.get("line_total_minor"),
        quantity: row.get("quantity"),
        image_ref: row.get("image_ref"),
        condition: OrderCondition::parse(&condition)
            .ok_or_else(|| anyhow!("unknown order condition `{condition}`"))?,
        created_at: row.get("created_at"),
    })
}

const ORDER_COLUMNS: &str =
    "order_id, user_id, payment_id, title, line_total_minor, quantity, image_ref, condition, created_at";

impl OrdersRepo {
    pub async fn insert_tx(tx: &mut Transaction<'_, Postgres>, order: &OrderRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO orders (order_id, user_id, payment_id, title, line_total_minor, quantity, image_ref, condition, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(order.order_id)
        .bind(order.user_id)
        .bind(order.payment_id)
        .bind(order.title.clone())
        .bind(order.line_total_minor)
        .bind(order.quantity)
        .bind(order.image_ref.clone())
        .bind(order.condition.as_str())
        .bind(order.created_at)
        .execute(tx.as_mut())
        .await?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl OrderRepository for OrdersRepo {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<OrderRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(order_from_row).collect()
    }

    async fn find_owned(&self, user_id: Uuid, order_id: Uuid) -> Result<Option<OrderRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = $1 AND user_id = $2"
        ))
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(order_from_row).transpose()
    }

    async fn set_condition(&self, order_id: Uuid, condition: OrderCondition) -> Result<()> {
        sqlx::query("UPDATE orders SET condition = $2 WHERE order_id = $1")
            .bind(order_id)
            .bind(condition.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete(&self, order_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM orders WHERE order_id = $1")
            .bind(order_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_for_user(&self, user_id: Uuid) -> Result<u64> {
        let res = sqlx::query("DELETE FROM orders WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(res.rows_affected())
    }
}
