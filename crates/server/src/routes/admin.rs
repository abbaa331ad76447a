//! Admin route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Manager-provisioning request body.
#[derive(Debug, Deserialize)]
pub struct CreateManagerRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Provision a manager account.
pub async fn create_manager(
    State(state): State<AppState>,
    RequireAdmin(_auth): RequireAdmin,
    Json(req): Json<CreateManagerRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let user = AuthService::new(state.pool(), state.tokens())
        .create_manager(&req.name, &req.email, &req.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Manager created successfully",
            "id": user.id,
        })),
    ))
}

/// Admin dashboard stub.
pub async fn dashboard(RequireAdmin(_auth): RequireAdmin) -> Json<Value> {
    Json(json!({ "message": "Welcome to the admin dashboard!" }))
}
