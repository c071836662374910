use crate::error::ApiError;
use crate::http::auth::AuthedUser;
use crate::service::verifier::{ConfirmParams, VerifyOutcome};
use crate::AppState;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (axum::http::StatusCode::OK, "ok")
}

pub async fn start_checkout(
    State(state): State<AppState>,
    AuthedUser(user_id): AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.checkout.start_checkout(user_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "payment link created",
        "total_amount_minor": session.total_minor,
        "gateway_order_ref": session.payment.gateway_order_ref,
        "payment_link": session.payment_link_url,
        "payment": session.payment,
    })))
}

#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    #[serde(rename = "paymentId")]
    pub payment_id: Option<String>,
    #[serde(rename = "orderRef")]
    pub order_ref: Option<String>,
    pub status: Option<String>,
}

/// Gateway confirmation callback. Unauthenticated by design: the caller is
/// the payment provider, keyed by the order reference it was handed.
pub async fn verify(
    State(state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> Result<Json<VerifyOutcome>, ApiError> {
    let outcome = state
        .verifier
        .confirm(ConfirmParams {
            gateway_payment_id: query.payment_id,
            gateway_order_ref: query.order_ref,
            gateway_status: query.status,
        })
        .await?;

    Ok(Json(outcome))
}

pub async fn list_payments(
    State(state): State<AppState>,
    AuthedUser(user_id): AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    let payments = state.payments_repo.list_for_user(user_id).await?;
    Ok(Json(json!({ "payments": payments })))
}

pub async fn delete_payments(
    State(state): State<AppState>,
    AuthedUser(user_id): AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.payments_repo.delete_for_user(user_id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "all payments deleted",
        "deleted": deleted,
    })))
}
