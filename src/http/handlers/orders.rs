use crate::error::ApiError;
use crate::http::auth::AuthedUser;
use crate::AppState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use uuid::Uuid;

pub async fn list_orders(
    State(state): State<AppState>,
    AuthedUser(user_id): AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    let orders = state.orders.list(user_id).await?;
    Ok(Json(json!({ "success": true, "orders": orders })))
}

pub async fn cancel_order(
    State(state): State<AppState>,
    AuthedUser(user_id): AuthedUser,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state.orders.cancel(user_id, order_id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "order cancelled",
        "order": order,
    })))
}

pub async fn delete_order(
    State(state): State<AppState>,
    AuthedUser(user_id): AuthedUser,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.orders.delete(user_id, Some(order_id)).await?;
    Ok(Json(json!({
        "success": true,
        "message": "order deleted",
    })))
}

pub async fn delete_all_orders(
    State(state): State<AppState>,
    AuthedUser(user_id): AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.orders.delete(user_id, None).await?;
    Ok(Json(json!({
        "success": true,
        "message": format!("{deleted} orders deleted"),
        "deleted": deleted,
    })))
}
