//! Cart route handlers: add and view.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

use market_lane_core::{ProductId, Quantity};

use crate::db::{CartRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::CartLineWithProduct;
use crate::state::AppState;

/// Add-to-cart request body.
///
/// `quantity` arrives as a raw integer and is validated here, at the edge;
/// checkout later trusts the stored value.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Append a cart line for the caller.
pub async fn add(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<AddToCartRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let quantity = Quantity::new(req.quantity).map_err(|_| {
        AppError::BadRequest("Quantity must be a positive integer".to_string())
    })?;

    let product = ProductRepository::new(state.pool())
        .get_by_id(req.product_id)
        .await?;
    if product.is_none() {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    let line = CartRepository::new(state.pool())
        .add_line(auth.id, req.product_id, quantity)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Added to cart",
            "id": line.id,
        })),
    ))
}

/// The caller's cart, joined with current product name, price, and stock.
pub async fn view(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<CartLineWithProduct>>> {
    let lines = CartRepository::new(state.pool())
        .lines_with_products(auth.id)
        .await?;
    Ok(Json(lines))
}
