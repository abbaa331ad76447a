//! Shop route handlers: listing, manager shop creation, shop login.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::db::{RepositoryError, ShopRepository};
use crate::error::{AppError, Result};
use crate::middleware::{AuthUser, RequireManager};
use crate::models::Shop;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Manager shop-creation request body.
#[derive(Debug, Deserialize)]
pub struct CreateShopRequest {
    pub name: String,
    pub location: String,
    pub email: String,
    pub password: String,
}

/// Shop-login request body.
#[derive(Debug, Deserialize)]
pub struct ShopLoginRequest {
    pub email: String,
    pub password: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// List all shops.
pub async fn list(State(state): State<AppState>, _auth: AuthUser) -> Result<Json<Vec<Shop>>> {
    let shops = ShopRepository::new(state.pool()).list().await?;
    Ok(Json(shops))
}

/// Create a shop owned by the calling manager, with its own credential.
pub async fn create_for_manager(
    State(state): State<AppState>,
    RequireManager(auth): RequireManager,
    Json(req): Json<CreateShopRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    if req.name.is_empty() || req.location.is_empty() {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    }

    let email = market_lane_core::Email::parse(&req.email)
        .map_err(|e| AppError::Auth(AuthError::InvalidEmail(e)))?;
    let password_hash = crate::services::auth::hash_password(&req.password)?;

    let shop = ShopRepository::new(state.pool())
        .create_for_manager(&req.name, &req.location, &email, &password_hash, auth.id)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AppError::Auth(AuthError::ShopEmailTaken),
            other => AppError::Database(other),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Shop created successfully",
            "shop": shop,
        })),
    ))
}

/// Login with a shop's own credential; returns a manager-scoped token.
pub async fn shop_login(
    State(state): State<AppState>,
    Json(req): Json<ShopLoginRequest>,
) -> Result<Json<Value>> {
    let session = AuthService::new(state.pool(), state.tokens())
        .shop_login(&req.email, &req.password)
        .await?;

    Ok(Json(json!({ "token": session.token })))
}
