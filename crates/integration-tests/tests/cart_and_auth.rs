//! Cart validation and authentication-guard tests.
//!
//! Run with: cargo test -p market-lane-integration-tests -- --ignored

use serde_json::{Value, json};

use market_lane_integration_tests::{add_to_cart, base_url, client, create_product, signup};

// ============================================================================
// Cart Validation
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_non_positive_quantity_rejected() {
    let client = client();
    let user = signup(&client).await;
    let product_id = create_product(&client, &user, "Bowl", "3.00", 10).await;

    for quantity in [0, -1] {
        let resp = add_to_cart(&client, &user, product_id, quantity).await;
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.expect("error body not JSON");
        assert_eq!(
            body["message"].as_str(),
            Some("Quantity must be a positive integer")
        );
    }

    // No cart row was created
    let resp = client
        .get(format!("{}/cart", base_url()))
        .bearer_auth(&user.token)
        .send()
        .await
        .expect("view cart request failed");
    let body: Value = resp.json().await.expect("cart body not JSON");
    assert_eq!(body.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_add_unknown_product_rejected() {
    let client = client();
    let user = signup(&client).await;

    let resp = add_to_cart(&client, &user, 999_999_999, 1).await;
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.expect("error body not JSON");
    assert_eq!(body["message"].as_str(), Some("Product not found"));
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_cart_view_joins_current_product_state() {
    let client = client();
    let user = signup(&client).await;
    let product_id = create_product(&client, &user, "Vase", "25.00", 8).await;
    add_to_cart(&client, &user, product_id, 2).await;

    let resp = client
        .get(format!("{}/cart", base_url()))
        .bearer_auth(&user.token)
        .send()
        .await
        .expect("view cart request failed");

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("cart body not JSON");
    let lines = body.as_array().expect("cart not an array");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["name"].as_str(), Some("Vase"));
    assert_eq!(lines[0]["stock"].as_i64(), Some(8));
    assert_eq!(lines[0]["quantity"].as_i64(), Some(2));
}

// ============================================================================
// Authentication Guard
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_missing_token_rejected() {
    let client = client();

    let resp = client
        .get(format!("{}/cart", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.expect("error body not JSON");
    assert_eq!(body["message"].as_str(), Some("No token provided"));
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_garbage_token_rejected() {
    let client = client();

    let resp = client
        .get(format!("{}/cart", base_url()))
        .bearer_auth("not-a-real-token")
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_regular_user_cannot_reach_admin_routes() {
    let client = client();
    let user = signup(&client).await;

    let resp = client
        .get(format!("{}/admin/dashboard", base_url()))
        .bearer_auth(&user.token)
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_duplicate_signup_email_rejected() {
    let client = client();
    let user = signup(&client).await;

    let resp = client
        .post(format!("{}/signup", base_url()))
        .json(&json!({
            "name": "Second",
            "email": user.email,
            "password": "another-pass",
            "shop_name": "Second Shop",
            "shop_address": "2 Test Street",
        }))
        .send()
        .await
        .expect("signup request failed");
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_login_roundtrip() {
    let client = client();
    let user = signup(&client).await;

    let resp = client
        .post(format!("{}/login", base_url()))
        .json(&json!({ "email": user.email, "password": "integration-pass" }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("login body not JSON");
    assert!(body["user"]["token"].as_str().is_some());

    let resp = client
        .post(format!("{}/login", base_url()))
        .json(&json!({ "email": user.email, "password": "wrong-password" }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(resp.status(), 400);
}
