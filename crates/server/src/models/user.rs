//! User domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use market_lane_core::{Email, Role, ShopId, UserId};

/// An account on the platform.
///
/// The password hash is never part of this type; repositories return it
/// separately where verification needs it.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Shop the account is affiliated with, if any.
    pub shop_id: Option<ShopId>,
    /// Display name.
    pub name: String,
    /// Email address (unique).
    pub email: Email,
    /// Account role.
    pub role: Role,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}
