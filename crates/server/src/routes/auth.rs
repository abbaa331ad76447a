//! Authentication route handlers: signup, login, current user.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use market_lane_core::{Email, Role, UserId};

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::services::auth::AuthService;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Signup request body.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub shop_name: String,
    pub shop_address: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The authenticated identity returned by signup and login.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: UserId,
    pub name: String,
    pub shop_name: Option<String>,
    pub role: Role,
    pub token: String,
}

/// Current-user response body.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a new user together with their shop.
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<Value>> {
    if req.name.is_empty()
        || req.email.is_empty()
        || req.password.is_empty()
        || req.shop_name.is_empty()
        || req.shop_address.is_empty()
    {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    }

    let session = AuthService::new(state.pool(), state.tokens())
        .signup(
            &req.name,
            &req.email,
            &req.password,
            &req.shop_name,
            &req.shop_address,
        )
        .await?;

    let user = SessionResponse {
        id: session.user.id,
        name: session.user.name,
        shop_name: session.shop.map(|s| s.name),
        role: session.user.role,
        token: session.token,
    };

    Ok(Json(json!({
        "message": "User registered successfully",
        "user": user,
    })))
}

/// Login with email and password.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Value>> {
    let session = AuthService::new(state.pool(), state.tokens())
        .login(&req.email, &req.password)
        .await?;

    let user = SessionResponse {
        id: session.user.id,
        name: session.user.name,
        shop_name: session.shop.map(|s| s.name),
        role: session.user.role,
        token: session.token,
    };

    Ok(Json(json!({
        "message": "Login successful",
        "user": user,
    })))
}

/// Details of the authenticated user.
pub async fn current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserResponse>> {
    let user = AuthService::new(state.pool(), state.tokens())
        .get_user(auth.id)
        .await?;

    Ok(Json(UserResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
    }))
}
