//! Unified error handling for route handlers.
//!
//! Provides a unified `AppError` type mapping the error taxonomy onto HTTP
//! statuses with JSON `{ "message": ... }` bodies. All route handlers
//! return `Result<T, AppError>`. Internal detail is logged, never exposed.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::checkout::CheckoutError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Checkout operation failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Operation not permitted for this caller.
    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(e) => repository_status(e),
            Self::Auth(e) => auth_status(e),
            Self::Checkout(e) => checkout_status(e),
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    /// The client-facing message. Storage failures collapse to a generic
    /// message; everything else is specific.
    fn message(&self) -> String {
        match self {
            Self::Database(e) => repository_message(e),
            Self::Auth(e) => auth_message(e),
            Self::Checkout(e) => checkout_message(e),
            Self::NotFound(msg) | Self::BadRequest(msg) | Self::Forbidden(msg) => msg.clone(),
        }
    }
}

fn repository_status(e: &RepositoryError) -> StatusCode {
    match e {
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::Conflict(_) => StatusCode::BAD_REQUEST,
        RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn repository_message(e: &RepositoryError) -> String {
    match e {
        RepositoryError::NotFound => "Not found".to_string(),
        RepositoryError::Conflict(msg) => msg.clone(),
        RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
            "Internal server error".to_string()
        }
    }
}

fn auth_status(e: &AuthError) -> StatusCode {
    match e {
        AuthError::InvalidCredentials
        | AuthError::InvalidEmail(_)
        | AuthError::WeakPassword(_)
        | AuthError::UserAlreadyExists
        | AuthError::ShopEmailTaken => StatusCode::BAD_REQUEST,
        AuthError::UserNotFound | AuthError::ShopNotFound => StatusCode::NOT_FOUND,
        AuthError::Token(_) | AuthError::PasswordHash => StatusCode::INTERNAL_SERVER_ERROR,
        AuthError::Repository(e) => repository_status(e),
    }
}

fn auth_message(e: &AuthError) -> String {
    match e {
        AuthError::InvalidCredentials => "Invalid credentials".to_string(),
        AuthError::InvalidEmail(_) => "Invalid email address".to_string(),
        AuthError::WeakPassword(msg) => msg.clone(),
        AuthError::UserAlreadyExists => {
            "Email is already registered. Please try with a different email.".to_string()
        }
        AuthError::ShopEmailTaken => "Shop email is already registered".to_string(),
        AuthError::UserNotFound => "User not found".to_string(),
        AuthError::ShopNotFound => "Shop not found".to_string(),
        AuthError::Token(_) | AuthError::PasswordHash => "Internal server error".to_string(),
        AuthError::Repository(e) => repository_message(e),
    }
}

fn checkout_status(e: &CheckoutError) -> StatusCode {
    match e {
        CheckoutError::EmptyCart | CheckoutError::InsufficientStock { .. } => {
            StatusCode::BAD_REQUEST
        }
        CheckoutError::ProductMissing(_) => StatusCode::NOT_FOUND,
        CheckoutError::Repository(e) => repository_status(e),
    }
}

fn checkout_message(e: &CheckoutError) -> String {
    match e {
        CheckoutError::EmptyCart => "Cart is empty".to_string(),
        CheckoutError::InsufficientStock { product_id, .. } => {
            format!("Not enough stock for product ID {product_id}")
        }
        CheckoutError::ProductMissing(_) => "Product not found".to_string(),
        CheckoutError::Repository(e) => repository_message(e),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request error");
        }

        (status, Json(json!({ "message": self.message() }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use market_lane_core::ProductId;

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::DataCorruption(
                "bad row".to_string()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_checkout_error_statuses() {
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::EmptyCart)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::InsufficientStock {
                product_id: ProductId::new(3),
                requested: 6,
                available: 5,
            })),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::ProductMissing(
                ProductId::new(3)
            ))),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_checkout_messages_identify_product() {
        let err = AppError::Checkout(CheckoutError::InsufficientStock {
            product_id: ProductId::new(42),
            requested: 6,
            available: 5,
        });
        assert_eq!(err.message(), "Not enough stock for product ID 42");

        let err = AppError::Checkout(CheckoutError::EmptyCart);
        assert_eq!(err.message(), "Cart is empty");
    }

    #[test]
    fn test_storage_failures_are_opaque() {
        let err = AppError::Database(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        assert_eq!(err.message(), "Internal server error");
    }

    #[test]
    fn test_auth_statuses() {
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::ShopNotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::UserAlreadyExists)),
            StatusCode::BAD_REQUEST
        );
    }
}
