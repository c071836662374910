use crate::domain::cart::CartItem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderCondition {
    Paid,
    Cancelled,
}

impl OrderCondition {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderCondition::Paid => "paid",
            OrderCondition::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "paid" => Some(OrderCondition::Paid),
            "cancelled" => Some(OrderCondition::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: Uuid,
    pub user_id: Uuid,
    pub payment_id: Uuid,
    pub title: String,
    pub line_total_minor: i64,
    pub quantity: i32,
    pub image_ref: Option<String>,
    pub condition: OrderCondition,
    pub created_at: DateTime<Utc>,
}

impl OrderRecord {
    /// One order row per cart line present at commit time; the line total is
    /// copied as-is so the sum over a payment's orders equals its amount.
    pub fn from_cart_line(payment_id: Uuid, item: &CartItem) -> Self {
        Self {
            order_id: Uuid::new_v4(),
            user_id: item.user_id,
            payment_id,
            title: item.title.clone(),
            line_total_minor: item.line_total_minor,
            quantity: item.quantity,
            image_ref: item.image_ref.clone(),
            condition: OrderCondition::Paid,
            created_at: Utc::now(),
        }
    }
}
