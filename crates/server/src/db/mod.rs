//! Database operations for the Market Lane `PostgreSQL` store.
//!
//! ## Tables
//!
//! - `shop` - Shops (signup-created or manager-created with credentials)
//! - `app_user` - Accounts with role and optional shop affiliation
//! - `product` - Catalog entries with the contended stock counter
//! - `cart_line` - Pending per-user reservations
//! - `product_history` - Append-only product-addition events
//! - `checkout_history` - Append-only checkout records (itemized JSONB + total)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p market-lane-cli -- migrate
//! ```

pub mod cart;
pub mod checkout;
pub mod products;
pub mod shops;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use cart::CartRepository;
pub use checkout::CheckoutRepository;
pub use products::ProductRepository;
pub use shops::ShopRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
