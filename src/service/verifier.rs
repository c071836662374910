use crate::domain::payment::{Payment, PaymentCondition};
use crate::error::ApiError;
use crate::repo::ports::PaymentRepository;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct ConfirmParams {
    pub gateway_payment_id: Option<String>,
    pub gateway_order_ref: Option<String>,
    pub gateway_status: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyOutcome {
    pub success: bool,
    pub message: String,
    pub payment: Option<Payment>,
}

/// Confirmation-callback state machine. The gateway may deliver the callback
/// zero or more times, out of order, or concurrently for the same reference;
/// every call funnels into one compare-and-swap on the payment condition and
/// materialization happens only on the winning call.
#[derive(Clone)]
pub struct PaymentVerifier {
    pub payments_repo: Arc<dyn PaymentRepository>,
}

impl PaymentVerifier {
    pub async fn confirm(&self, params: ConfirmParams) -> Result<VerifyOutcome, ApiError> {
        // A browser refresh re-triggers the callback route without params;
        // that is a benign no-op, not an error.
        let (Some(gateway_payment_id), Some(order_ref), Some(status)) = (
            params.gateway_payment_id,
            params.gateway_order_ref,
            params.gateway_status,
        ) else {
            return Ok(VerifyOutcome {
                success: false,
                message: "nothing to verify".to_string(),
                payment: None,
            });
        };

        let payment = self
            .payments_repo
            .find_by_order_ref(&order_ref)
            .await?
            .ok_or(ApiError::NotFound("payment record not found"))?;

        if payment.condition.is_terminal() {
            return Ok(Self::already_settled(payment));
        }

        let target = if status == "paid" {
            PaymentCondition::Paid
        } else {
            PaymentCondition::Failed
        };

        let won = self
            .payments_repo
            .transition_if_created(
                payment.payment_id,
                payment.user_id,
                &gateway_payment_id,
                target,
            )
            .await?;

        let Some(orders) = won else {
            // A concurrent duplicate got there first; report the state it left.
            let current = self
                .payments_repo
                .find_by_order_ref(&order_ref)
                .await?
                .ok_or(ApiError::NotFound("payment record not found"))?;
            return Ok(Self::already_settled(current));
        };

        let settled = Payment {
            gateway_payment_id: Some(gateway_payment_id),
            condition: target,
            ..payment
        };

        if target == PaymentCondition::Paid {
            tracing::info!(
                payment_id = %settled.payment_id,
                orders = orders.len(),
                "payment confirmed, cart materialized"
            );
            Ok(VerifyOutcome {
                success: true,
                message: "payment success, cart items moved to orders".to_string(),
                payment: Some(settled),
            })
        } else {
            tracing::info!(payment_id = %settled.payment_id, "payment failed at gateway");
            Ok(VerifyOutcome {
                success: true,
                message: "payment failed".to_string(),
                payment: Some(settled),
            })
        }
    }

    fn already_settled(payment: Payment) -> VerifyOutcome {
        VerifyOutcome {
            success: true,
            message: format!("payment already {}", payment.condition.as_str()),
            payment: Some(payment),
        }
    }
}
