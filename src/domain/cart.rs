use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub cart_item_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    /// Line aggregate in minor units: unit price x quantity as stored.
    pub line_total_minor: i64,
    pub quantity: i32,
    pub image_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCartItem {
    pub title: String,
    pub line_total_minor: i64,
    pub quantity: i32,
    pub image_ref: Option<String>,
}

impl CartItem {
    pub fn new(user_id: Uuid, item: NewCartItem) -> Self {
        Self {
            cart_item_id: Uuid::new_v4(),
            user_id,
            title: item.title,
            line_total_minor: item.line_total_minor,
            quantity: item.quantity,
            image_ref: item.image_ref,
            created_at: Utc::now(),
        }
    }

    /// New line total for a changed quantity. The stored total is the
    /// aggregate for the line, so the per-unit price is re-derived first.
    pub fn repriced_total(&self, quantity: i32) -> Option<i64> {
        if quantity <= 0 || self.quantity <= 0 {
            return None;
        }
        let per_unit = self.line_total_minor / i64::from(self.quantity);
        Some(per_unit * i64::from(quantity))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CartSummary {
    pub items: Vec<CartItem>,
    pub total_minor: i64,
}
