//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (database ping)
//!
//! # Auth
//! POST /signup                  - Register user + shop, returns token
//! POST /login                   - Login, returns token
//! GET  /user                    - Current user details
//!
//! # Shops
//! GET  /shops                   - List all shops
//!
//! # Products
//! POST   /products              - Create product (+ history entry)
//! GET    /products              - List caller's products
//! GET    /products/history      - Product-addition history
//! DELETE /products/{id}         - Delete owned product
//!
//! # Cart & Checkout
//! POST /cart/add                - Add a cart line
//! GET  /cart                    - View cart (joined with products)
//! POST /cart/checkout           - Checkout (transactional)
//! GET  /cart/checkout/history   - Checkout history
//!
//! # Admin (role: admin)
//! POST /admin/managers          - Provision a manager account
//! GET  /admin/dashboard         - Dashboard stub
//!
//! # Manager (role: manager)
//! POST /manager/shops           - Create a shop with its own credential
//! POST /manager/shop-login      - Login with a shop credential
//! POST /manager/products        - Create a product for the token's shop
//! GET  /manager/products        - List the token's shop's products
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod products;
pub mod shops;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/user", get(auth::current_user))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    use axum::routing::delete;

    Router::new()
        .route("/", post(products::create).get(products::list))
        .route("/history", get(products::history))
        .route("/{id}", delete(products::remove))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::view))
        .route("/add", post(cart::add))
        .route("/checkout", post(checkout::checkout))
        .route("/checkout/history", get(checkout::history))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/managers", post(admin::create_manager))
        .route("/dashboard", get(admin::dashboard))
}

/// Create the manager routes router.
pub fn manager_routes() -> Router<AppState> {
    Router::new()
        .route("/shops", post(shops::create_for_manager))
        .route("/shop-login", post(shops::shop_login))
        .route(
            "/products",
            post(products::create_for_shop).get(products::list_for_shop),
        )
}

/// Create all routes for the server.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .route("/shops", get(shops::list))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/admin", admin_routes())
        .nest("/manager", manager_routes())
}
