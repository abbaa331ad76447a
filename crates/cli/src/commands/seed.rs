//! Demo-data seeding for local development.
//!
//! Creates one demo user with a shop and a handful of products, so a fresh
//! database has something to add to a cart and check out.

use rust_decimal::Decimal;

use market_lane_core::Email;
use market_lane_server::db::{ProductRepository, UserRepository};
use market_lane_server::services::auth::hash_password;

use super::CommandError;

const DEMO_EMAIL: &str = "demo@market-lane.test";
const DEMO_PASSWORD: &str = "demo-password";

/// Seed the database with demo data.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    let email = Email::parse(DEMO_EMAIL)?;
    let password_hash = hash_password(DEMO_PASSWORD)?;

    let (user, shop) = UserRepository::new(&pool)
        .create_with_shop(
            "Demo User",
            &email,
            &password_hash,
            "Demo Shop",
            "1 Demo Street",
        )
        .await?;

    let products = ProductRepository::new(&pool);
    for (name, price, stock) in [
        ("Ceramic mug", "12.50", 40),
        ("Linen tote bag", "18.00", 25),
        ("Beeswax candle", "9.90", 60),
    ] {
        let price: Decimal = price.parse().unwrap_or_default();
        products
            .create_with_history(user.id, Some(shop.id), name, price, stock)
            .await?;
    }

    tracing::info!(
        user_id = %user.id,
        shop_id = %shop.id,
        "demo data seeded (login: {DEMO_EMAIL} / {DEMO_PASSWORD})"
    );
    Ok(())
}
