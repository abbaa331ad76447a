//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! ml-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `MARKET_LANE_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to `DATABASE_URL`)
//!
//! Migration files live in `crates/server/migrations/`.

use std::path::Path;

use sqlx::migrate::Migrator;

use super::CommandError;

/// Run all pending server migrations.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    let migrator = Migrator::new(Path::new("crates/server/migrations")).await?;
    migrator.run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
