//! Cart domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use market_lane_core::{CartLineId, ProductId, Quantity, UserId};

/// One pending (product, quantity) reservation for a user.
///
/// Repeated additions of the same product create multiple lines; duplicate
/// lines are merged only when checkout sums demand per product.
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    /// Unique line ID.
    pub id: CartLineId,
    /// User the cart belongs to.
    pub user_id: UserId,
    /// Referenced product.
    pub product_id: ProductId,
    /// Requested units. Positive by construction.
    pub quantity: Quantity,
    /// When the line was added.
    pub created_at: DateTime<Utc>,
}

/// A cart line joined with the current state of its product.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineWithProduct {
    /// Unique line ID.
    pub line_id: CartLineId,
    /// Referenced product.
    pub product_id: ProductId,
    /// Current product name.
    pub name: String,
    /// Current unit price.
    pub price: Decimal,
    /// Current available stock.
    pub stock: i32,
    /// Requested units.
    pub quantity: Quantity,
}
