//! Shop domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use market_lane_core::{Email, ShopId, UserId};

/// A shop.
///
/// Shops are created at signup (one per signup) or by a manager. A shop
/// created by a manager carries its own credential (email + password hash,
/// the hash kept out of this type) enabling shop-level login.
#[derive(Debug, Clone, Serialize)]
pub struct Shop {
    /// Unique shop ID.
    pub id: ShopId,
    /// Shop display name.
    pub name: String,
    /// Street address or location description.
    pub location: String,
    /// Owning manager, when created through the manager flow.
    pub manager_id: Option<UserId>,
    /// Shop login email, when the shop has its own credential.
    pub email: Option<Email>,
    /// When the shop was created.
    pub created_at: DateTime<Utc>,
}
