use crate::domain::order::{OrderCondition, OrderRecord};
use crate::error::ApiError;
use crate::repo::ports::OrderRepository;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct OrderService {
    pub orders_repo: Arc<dyn OrderRepository>,
}

impl OrderService {
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<OrderRecord>, ApiError> {
        Ok(self.orders_repo.list_for_user(user_id).await?)
    }

    /// Ownership-checked cancel. Re-cancelling an already-cancelled order is
    /// an idempotent no-op returning the current row.
    pub async fn cancel(&self, user_id: Uuid, order_id: Uuid) -> Result<OrderRecord, ApiError> {
        let order = self
            .orders_repo
            .find_owned(user_id, order_id)
            .await?
            .ok_or(ApiError::NotFound("order not found"))?;

        if order.condition == OrderCondition::Cancelled {
            return Ok(order);
        }

        self.orders_repo
            .set_condition(order_id, OrderCondition::Cancelled)
            .await?;

        Ok(OrderRecord {
            condition: OrderCondition::Cancelled,
            ..order
        })
    }

    /// With an id, deletes one owned order; without, deletes all of the
    /// caller's orders. Returns the number of rows removed.
    pub async fn delete(&self, user_id: Uuid, order_id: Option<Uuid>) -> Result<u64, ApiError> {
        match order_id {
            Some(order_id) => {
                self.orders_repo
                    .find_owned(user_id, order_id)
                    .await?
                    .ok_or(ApiError::NotFound("order not found"))?;
                self.orders_repo.delete(order_id).await?;
                Ok(1)
            }
            None => Ok(self.orders_repo.delete_for_user(user_id).await?),
        }
    }
}
