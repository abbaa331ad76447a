//! Integration tests for Market Lane.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL and run migrations
//! cargo run -p market-lane-cli -- migrate
//!
//! # Start the server
//! cargo run -p market-lane-server
//!
//! # Run integration tests
//! cargo test -p market-lane-integration-tests -- --ignored
//! ```
//!
//! Tests are `#[ignore]`d by default because they require a running server
//! and database. Each test registers its own throwaway user (unique email)
//! so tests do not interfere with each other or with existing data.

use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the server API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("MARKET_LANE_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A registered test user with their bearer token.
pub struct TestUser {
    pub email: String,
    pub token: String,
}

/// Create an HTTP client.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

/// Register a throwaway user (unique email) and return their token.
///
/// # Panics
///
/// Panics if signup fails; integration tests cannot proceed without it.
pub async fn signup(client: &Client) -> TestUser {
    let email = format!("it-{}@market-lane.test", Uuid::new_v4());
    let resp = client
        .post(format!("{}/signup", base_url()))
        .json(&json!({
            "name": "Integration Tester",
            "email": email,
            "password": "integration-pass",
            "shop_name": "Test Shop",
            "shop_address": "1 Test Street",
        }))
        .send()
        .await
        .expect("signup request failed");

    assert!(resp.status().is_success(), "signup returned {}", resp.status());
    let body: Value = resp.json().await.expect("signup body not JSON");
    let token = body["user"]["token"]
        .as_str()
        .expect("signup response missing token")
        .to_string();

    TestUser { email, token }
}

/// Create a product as the given user; returns its id.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn create_product(
    client: &Client,
    user: &TestUser,
    name: &str,
    price: &str,
    stock: i32,
) -> i64 {
    let resp = client
        .post(format!("{}/products", base_url()))
        .bearer_auth(&user.token)
        .json(&json!({ "name": name, "price": price, "stock": stock }))
        .send()
        .await
        .expect("create product request failed");

    assert_eq!(resp.status(), 201, "create product returned {}", resp.status());
    let body: Value = resp.json().await.expect("create product body not JSON");
    body["id"].as_i64().expect("create product response missing id")
}

/// Add a product to the user's cart; returns the raw response.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn add_to_cart(
    client: &Client,
    user: &TestUser,
    product_id: i64,
    quantity: i64,
) -> reqwest::Response {
    client
        .post(format!("{}/cart/add", base_url()))
        .bearer_auth(&user.token)
        .json(&json!({ "product_id": product_id, "quantity": quantity }))
        .send()
        .await
        .expect("add to cart request failed")
}

/// Trigger checkout for the user; returns the raw response.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn checkout(client: &Client, user: &TestUser) -> reqwest::Response {
    client
        .post(format!("{}/cart/checkout", base_url()))
        .bearer_auth(&user.token)
        .send()
        .await
        .expect("checkout request failed")
}

/// Fetch the current stock of a product as seen in the owner's listing.
///
/// # Panics
///
/// Panics if the request fails or the product is absent.
pub async fn product_stock(client: &Client, owner: &TestUser, product_id: i64) -> i64 {
    let resp = client
        .get(format!("{}/products", base_url()))
        .bearer_auth(&owner.token)
        .send()
        .await
        .expect("list products request failed");

    assert!(resp.status().is_success());
    let body: Value = resp.json().await.expect("list products body not JSON");
    body.as_array()
        .expect("product list not an array")
        .iter()
        .find(|p| p["id"].as_i64() == Some(product_id))
        .and_then(|p| p["stock"].as_i64())
        .expect("product not found in listing")
}
