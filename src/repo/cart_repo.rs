use crate::domain::cart::CartItem;
use crate::repo::ports::CartRepository;
use anyhow::Result;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

#[derive(Clone)]
pub struct CartRepo {
    pub pool: PgPool,
}

pub(crate) fn cart_item_from_row(row: &sqlx::postgres::PgRow) -> CartItem {
    CartItem {
        cart_item_id: row.get("cart_item_id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        line_total_minor: row.get("line_total_minor"),
        quantity: row.get("quantity"),
        image_ref: row.get("image_ref"),
        created_at: row.get("created_at"),
    }
}

impl CartRepo {
    /// Cart lines for a user, locked for the duration of the transaction.
    pub async fn lines_for_update_tx(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
    ) -> Result<Vec<CartItem>> {
        let rows = sqlx::query(
            r#"
            SELECT cart_item_id, user_id, title, line_total_minor, quantity, image_ref, created_at
            FROM cart_items
            WHERE user_id = $1
            ORDER BY created_at ASC
            FOR UPDATE
            "#,
        )
        .bind(user_id)
        .fetch_all(tx.as_mut())
        .await?;

        Ok(rows.iter().map(cart_item_from_row).collect())
    }

    pub async fn delete_lines_tx(
        tx: &mut Transaction<'_, Postgres>,
        cart_item_ids: &[Uuid],
    ) -> Result<()> {
        sqlx::query("DELETE FROM cart_items WHERE cart_item_id = ANY($1)")
            .bind(cart_item_ids)
            .execute(tx.as_mut())
            .await?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl CartRepository for CartRepo {
    async fn create(&self, item: CartItem) -> Result<CartItem> {
        sqlx::query(
            r#"
            INSERT INTO cart_items (cart_item_id, user_id, title, line_total_minor, quantity, image_ref, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(item.cart_item_id)
        .bind(item.user_id)
        .bind(item.title.clone())
        .bind(item.line_total_minor)
        .bind(item.quantity)
        .bind(item.image_ref.clone())
        .bind(item.created_at)
        .execute(&self.pool)
        .await?;

        Ok(item)
    }

    async fn find_for_user(&self, user_id: Uuid) -> Result<Vec<CartItem>> {
        let rows = sqlx::query(
            r#"
            SELECT cart_item_id, user_id, title, line_total_minor, quantity, image_ref, created_at
            FROM cart_items
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(cart_item_from_row).collect())
    }

    async fn find_owned(&self, user_id: Uuid, cart_item_id: Uuid) -> Result<Option<CartItem>> {
        let row = sqlx::query(
            r#"
            SELECT cart_item_id, user_id, title, line_total_minor, quantity, image_ref, created_at
            FROM cart_items
            WHERE cart_item_id = $1 AND user_id = $2
            "#,
        )
        .bind(cart_item_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(cart_item_from_row))
    }

    async fn update_quantity(
        &self,
        cart_item_id: Uuid,
        quantity: i32,
        line_total_minor: i64,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE cart_items SET quantity = $2, line_total_minor = $3 WHERE cart_item_id = $1",
        )
        .bind(cart_item_id)
        .bind(quantity)
        .bind(line_total_minor)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, cart_item_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM cart_items WHERE cart_item_id = $1")
            .bind(cart_item_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
