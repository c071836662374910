use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentCondition {
    Created,
    Paid,
    Failed,
}

impl PaymentCondition {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentCondition::Created => "created",
            PaymentCondition::Paid => "paid",
            PaymentCondition::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "created" => Some(PaymentCondition::Created),
            "paid" => Some(PaymentCondition::Paid),
            "failed" => Some(PaymentCondition::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self != PaymentCondition::Created
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub payment_id: Uuid,
    pub user_id: Uuid,
    pub amount_minor: i64,
    pub gateway_order_ref: String,
    pub gateway_payment_id: Option<String>,
    pub condition: PaymentCondition,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    pub fn open(user_id: Uuid, amount_minor: i64, gateway_order_ref: String) -> Self {
        Self {
            payment_id: Uuid::new_v4(),
            user_id,
            amount_minor,
            gateway_order_ref,
            gateway_payment_id: None,
            condition: PaymentCondition::Created,
            created_at: Utc::now(),
        }
    }
}
