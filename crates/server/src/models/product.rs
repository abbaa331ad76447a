//! Product and product-history domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use market_lane_core::{ProductHistoryId, ProductId, ShopId, UserId};

/// A catalog product.
///
/// The stock counter is mutated only by checkout; everything else changes
/// only through explicit catalog operations.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// User who listed the product.
    pub owner_id: UserId,
    /// Shop the product belongs to, if any.
    pub shop_id: Option<ShopId>,
    /// Product display name.
    pub name: String,
    /// Unit price. Non-negative.
    pub price: Decimal,
    /// Available units. Never negative.
    pub stock: i32,
    /// When the product was listed.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// An append-only record of a product-addition event.
#[derive(Debug, Clone, Serialize)]
pub struct ProductHistoryEntry {
    /// Unique entry ID.
    pub id: ProductHistoryId,
    /// User who listed the product.
    pub user_id: UserId,
    /// Product name at the time of listing.
    pub product_name: String,
    /// Unit price at the time of listing.
    pub price: Decimal,
    /// Units listed.
    pub quantity: i32,
    /// When the product was listed.
    pub created_at: DateTime<Utc>,
}
