//! End-to-end checkout tests.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p market-lane-server)
//!
//! Run with: cargo test -p market-lane-integration-tests -- --ignored

use serde_json::Value;

use market_lane_integration_tests::{
    add_to_cart, checkout, client, create_product, product_stock, signup,
};

// ============================================================================
// Happy Path
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_checkout_decrements_stock_and_drains_cart() {
    let client = client();
    let user = signup(&client).await;

    let product_id = create_product(&client, &user, "Mug", "12.50", 10).await;
    assert_eq!(add_to_cart(&client, &user, product_id, 3).await.status(), 201);

    let resp = checkout(&client, &user).await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("checkout body not JSON");
    assert_eq!(body["history"]["total_amount"].as_str(), Some("37.50"));
    assert_eq!(body["history"]["items"].as_array().map(Vec::len), Some(1));

    // Stock decremented by exactly the purchased quantity
    assert_eq!(product_stock(&client, &user, product_id).await, 7);

    // Cart drained: a second checkout finds it empty
    let resp = checkout(&client, &user).await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.expect("error body not JSON");
    assert_eq!(body["message"].as_str(), Some("Cart is empty"));
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_duplicate_lines_are_summed_at_checkout() {
    let client = client();
    let user = signup(&client).await;

    // stock=5, two lines of 2 (sum 4) succeed leaving 1
    let product_id = create_product(&client, &user, "Candle", "1.00", 5).await;
    add_to_cart(&client, &user, product_id, 2).await;
    add_to_cart(&client, &user, product_id, 2).await;

    assert_eq!(checkout(&client, &user).await.status(), 200);
    assert_eq!(product_stock(&client, &user, product_id).await, 1);
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_checkout_history_returned_after_purchase() {
    let client = client();
    let user = signup(&client).await;

    let product_id = create_product(&client, &user, "Tote", "18.00", 4).await;
    add_to_cart(&client, &user, product_id, 1).await;
    checkout(&client, &user).await;

    let resp = client
        .get(format!(
            "{}/cart/checkout/history",
            market_lane_integration_tests::base_url()
        ))
        .bearer_auth(&user.token)
        .send()
        .await
        .expect("history request failed");

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("history body not JSON");
    assert_eq!(body["history"].as_array().map(Vec::len), Some(1));
}

// ============================================================================
// Rollback Semantics
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_insufficient_stock_rolls_back_everything() {
    let client = client();
    let user = signup(&client).await;

    // Three lines of 2 (sum 6) against stock 5: the first two lines would
    // individually fit, but nothing may be committed.
    let product_id = create_product(&client, &user, "Plate", "2.00", 5).await;
    add_to_cart(&client, &user, product_id, 2).await;
    add_to_cart(&client, &user, product_id, 2).await;
    add_to_cart(&client, &user, product_id, 2).await;

    let resp = checkout(&client, &user).await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.expect("error body not JSON");
    assert_eq!(
        body["message"].as_str(),
        Some(format!("Not enough stock for product ID {product_id}").as_str())
    );

    // Stock unchanged, cart untouched (all three lines still present)
    assert_eq!(product_stock(&client, &user, product_id).await, 5);

    let resp = client
        .get(format!("{}/cart", market_lane_integration_tests::base_url()))
        .bearer_auth(&user.token)
        .send()
        .await
        .expect("view cart request failed");
    let body: Value = resp.json().await.expect("cart body not JSON");
    assert_eq!(body.as_array().map(Vec::len), Some(3));
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_empty_cart_checkout_rejected() {
    let client = client();
    let user = signup(&client).await;

    let resp = checkout(&client, &user).await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.expect("error body not JSON");
    assert_eq!(body["message"].as_str(), Some("Cart is empty"));
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_concurrent_checkouts_never_drive_stock_negative() {
    let client = client();
    let owner = signup(&client).await;

    // Combined demand (4 + 4) exceeds stock 6: at most one checkout may win.
    let product_id = create_product(&client, &owner, "Limited", "5.00", 6).await;

    let alice = signup(&client).await;
    let bob = signup(&client).await;
    add_to_cart(&client, &alice, product_id, 4).await;
    add_to_cart(&client, &bob, product_id, 4).await;

    let (alice_resp, bob_resp) =
        tokio::join!(checkout(&client, &alice), checkout(&client, &bob));

    let successes = [alice_resp.status(), bob_resp.status()]
        .iter()
        .filter(|s| s.is_success())
        .count();
    assert!(successes <= 1, "both concurrent checkouts succeeded");

    let remaining = product_stock(&client, &owner, product_id).await;
    assert!(remaining >= 0, "stock went negative: {remaining}");
    if successes == 1 {
        assert_eq!(remaining, 2);
    } else {
        assert_eq!(remaining, 6);
    }
}
