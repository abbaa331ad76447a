//! Checkout-history domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use market_lane_core::{CheckoutId, ProductId, UserId};

/// One line of a completed checkout, as captured at purchase time.
///
/// Stored inside the checkout record's itemized JSONB snapshot, so later
/// price or name edits on the product never rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutItem {
    /// Purchased product.
    pub product_id: ProductId,
    /// Units purchased on this line.
    pub quantity: i32,
    /// Unit price at the time of purchase.
    pub price: Decimal,
    /// Line amount: `quantity * price`.
    pub amount: Decimal,
}

/// An append-only record of one completed checkout.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutRecord {
    /// Unique record ID.
    pub id: CheckoutId,
    /// User who checked out.
    pub user_id: UserId,
    /// Itemized snapshot, one entry per cart line.
    pub items: Vec<CheckoutItem>,
    /// Aggregate amount across all items.
    pub total_amount: Decimal,
    /// When the checkout committed.
    pub created_at: DateTime<Utc>,
}
