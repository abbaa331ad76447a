//! Checkout route handlers.

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::services::CheckoutService;
use crate::state::AppState;

/// Convert the caller's cart into a committed purchase.
///
/// All-or-nothing: on failure no stock counter or cart row has changed.
pub async fn checkout(State(state): State<AppState>, auth: AuthUser) -> Result<Json<Value>> {
    let record = CheckoutService::new(state.pool()).checkout(auth.id).await?;

    Ok(Json(json!({
        "message": "Checkout successful, products updated!",
        "history": record,
    })))
}

/// The caller's checkout history, newest first.
pub async fn history(State(state): State<AppState>, auth: AuthUser) -> Result<Json<Value>> {
    let records = CheckoutService::new(state.pool()).history(auth.id).await?;

    if records.is_empty() {
        return Err(AppError::NotFound("No checkout history found".to_string()));
    }

    Ok(Json(json!({
        "message": "Checkout history fetched successfully",
        "history": records,
    })))
}
