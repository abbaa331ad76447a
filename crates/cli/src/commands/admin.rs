//! Admin provisioning command.
//!
//! The `admin` role is never granted through HTTP signup; this command is
//! the only way to mint one.

use market_lane_core::{Email, Role};
use market_lane_server::db::UserRepository;
use market_lane_server::services::auth::hash_password;

use super::CommandError;

/// Create an admin user.
pub async fn create_user(email: &str, name: &str, password: &str) -> Result<(), CommandError> {
    let pool = super::connect().await?;

    let email = Email::parse(email)?;
    let password_hash = hash_password(password)?;

    let user = UserRepository::new(&pool)
        .create_with_role(name, &email, &password_hash, Role::Admin)
        .await?;

    tracing::info!(user_id = %user.id, email = %user.email, "admin user created");
    Ok(())
}
