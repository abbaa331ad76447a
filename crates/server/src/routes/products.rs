//! Product route handlers: catalog CRUD and product history.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};

use market_lane_core::{ProductId, ShopId};

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::{AuthUser, RequireManager};
use crate::models::{Product, ProductHistoryEntry};
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Product-creation request body.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
}

/// Manager product-creation request body. The shop must match the token.
#[derive(Debug, Deserialize)]
pub struct CreateShopProductRequest {
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
    pub shop_id: ShopId,
}

fn validate_listing(name: &str, price: Decimal, stock: i32) -> Result<()> {
    if name.is_empty() {
        return Err(AppError::BadRequest("Product name is required".to_string()));
    }
    if price < Decimal::ZERO {
        return Err(AppError::BadRequest("Price must not be negative".to_string()));
    }
    if stock < 0 {
        return Err(AppError::BadRequest("Stock must not be negative".to_string()));
    }
    Ok(())
}

// =============================================================================
// Handlers
// =============================================================================

/// Create a product owned by the caller. Appends a history entry in the
/// same transaction.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    validate_listing(&req.name, req.price, req.stock)?;

    let product = ProductRepository::new(state.pool())
        .create_with_history(auth.id, auth.shop_id, &req.name, req.price, req.stock)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Product added successfully, history logged",
            "id": product.id,
        })),
    ))
}

/// List the caller's products.
pub async fn list(State(state): State<AppState>, auth: AuthUser) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool())
        .list_for_owner(auth.id)
        .await?;
    Ok(Json(products))
}

/// Delete a product owned by the caller.
pub async fn remove(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ProductId>,
) -> Result<Json<Value>> {
    let deleted = ProductRepository::new(state.pool())
        .delete_owned(auth.id, id)
        .await?;

    if !deleted {
        return Err(AppError::NotFound(
            "Product not found or not authorized to delete".to_string(),
        ));
    }

    Ok(Json(json!({ "message": "Product deleted successfully" })))
}

/// The caller's product-addition history, newest first.
pub async fn history(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Value>> {
    let entries: Vec<ProductHistoryEntry> = ProductRepository::new(state.pool())
        .history_for_user(auth.id)
        .await?;

    if entries.is_empty() {
        return Err(AppError::NotFound("No product history found".to_string()));
    }

    Ok(Json(json!({
        "message": "Product history fetched successfully",
        "history": entries,
    })))
}

/// Create a product for the manager's shop. The shop in the request must
/// match the shop carried in the token.
pub async fn create_for_shop(
    State(state): State<AppState>,
    RequireManager(auth): RequireManager,
    Json(req): Json<CreateShopProductRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    validate_listing(&req.name, req.price, req.stock)?;

    let token_shop = auth.shop_id.ok_or_else(|| {
        AppError::Forbidden("Token carries no shop affiliation".to_string())
    })?;
    if token_shop != req.shop_id {
        return Err(AppError::Forbidden(
            "You can only create products for your shop".to_string(),
        ));
    }

    let product = ProductRepository::new(state.pool())
        .create_with_history(auth.id, Some(token_shop), &req.name, req.price, req.stock)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Product created successfully",
            "id": product.id,
        })),
    ))
}

/// List the products of the manager's shop.
pub async fn list_for_shop(
    State(state): State<AppState>,
    RequireManager(auth): RequireManager,
) -> Result<Json<Vec<Product>>> {
    let shop_id = auth.shop_id.ok_or_else(|| {
        AppError::Forbidden("Token carries no shop affiliation".to_string())
    })?;

    let products = ProductRepository::new(state.pool())
        .list_for_shop(shop_id)
        .await?;
    Ok(Json(products))
}
