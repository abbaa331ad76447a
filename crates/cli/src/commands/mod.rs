//! CLI subcommand implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

/// Errors shared by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Repository error: {0}")]
    Repository(#[from] market_lane_server::db::RepositoryError),

    #[error("Auth error: {0}")]
    Auth(#[from] market_lane_server::services::AuthError),

    #[error("Invalid email: {0}")]
    Email(#[from] market_lane_core::EmailError),
}

/// Connect to the database named by the environment.
pub(crate) async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("MARKET_LANE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CommandError::MissingEnvVar("MARKET_LANE_DATABASE_URL"))?;

    let pool = market_lane_server::db::create_pool(&SecretString::from(database_url)).await?;
    Ok(pool)
}
