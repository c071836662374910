use crate::domain::cart::{CartItem, NewCartItem};
use crate::error::ApiError;
use crate::http::auth::AuthedUser;
use crate::AppState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

pub async fn add_item(
    State(state): State<AppState>,
    AuthedUser(user_id): AuthedUser,
    Json(req): Json<NewCartItem>,
) -> Result<impl IntoResponse, ApiError> {
    if req.title.trim().is_empty() {
        return Err(ApiError::Validation("title is required".to_string()));
    }
    if req.quantity <= 0 {
        return Err(ApiError::Validation("quantity must be positive".to_string()));
    }
    if req.line_total_minor < 0 {
        return Err(ApiError::Validation("price must not be negative".to_string()));
    }

    let item = state.cart_repo.create(CartItem::new(user_id, req)).await?;
    Ok(Json(json!({
        "message": "item added to cart",
        "cart_item": item,
    })))
}

pub async fn list_items(
    State(state): State<AppState>,
    AuthedUser(user_id): AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    let items = state.cart_repo.find_for_user(user_id).await?;
    Ok(Json(json!({ "cart_items": items })))
}

pub async fn remove_item(
    State(state): State<AppState>,
    AuthedUser(user_id): AuthedUser,
    Path(cart_item_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .cart_repo
        .find_owned(user_id, cart_item_id)
        .await?
        .ok_or(ApiError::NotFound("cart item not found"))?;

    state.cart_repo.delete(cart_item_id).await?;
    Ok(Json(json!({ "message": "cart item removed" })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i32,
}

pub async fn update_quantity(
    State(state): State<AppState>,
    AuthedUser(user_id): AuthedUser,
    Path(cart_item_id): Path<Uuid>,
    Json(req): Json<UpdateQuantityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state
        .cart_repo
        .find_owned(user_id, cart_item_id)
        .await?
        .ok_or(ApiError::NotFound("cart item not found"))?;

    let line_total_minor = item
        .repriced_total(req.quantity)
        .ok_or_else(|| ApiError::Validation("quantity must be positive".to_string()))?;

    state
        .cart_repo
        .update_quantity(cart_item_id, req.quantity, line_total_minor)
        .await?;

    Ok(Json(json!({
        "message": "cart updated",
        "cart_item": CartItem {
            quantity: req.quantity,
            line_total_minor,
            ..item
        },
    })))
}
