//! Checkout storage operations.
//!
//! The write path here is transaction-scoped on purpose: every function in
//! the lower half takes `&mut PgConnection` and is only ever called by the
//! checkout engine between `begin()` and `commit()`. The engine owns the
//! ordering; this module owns the SQL.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use std::collections::BTreeMap;

use market_lane_core::{CheckoutId, ProductId, UserId};

use super::RepositoryError;
use super::cart::CartLineRow;
use crate::models::{CartLine, CheckoutItem, CheckoutRecord};

/// A product row as seen under `FOR UPDATE` inside a checkout transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockedProduct {
    /// Product ID.
    pub id: ProductId,
    /// Unit price at this instant; snapshotted into the history record.
    pub price: Decimal,
    /// Stock at this instant; no other checkout can change it until commit.
    pub stock: i32,
}

/// Internal row type for locked product loads.
#[derive(Debug, sqlx::FromRow)]
struct LockedProductRow {
    id: i32,
    price: Decimal,
    stock: i32,
}

/// Internal row type for checkout-history queries.
#[derive(Debug, sqlx::FromRow)]
struct CheckoutRecordRow {
    id: i32,
    user_id: i32,
    items: Json<Vec<CheckoutItem>>,
    total_amount: Decimal,
    created_at: DateTime<Utc>,
}

impl From<CheckoutRecordRow> for CheckoutRecord {
    fn from(row: CheckoutRecordRow) -> Self {
        Self {
            id: CheckoutId::new(row.id),
            user_id: UserId::new(row.user_id),
            items: row.items.0,
            total_amount: row.total_amount,
            created_at: row.created_at,
        }
    }
}

/// Repository for checkout-history reads.
pub struct CheckoutRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CheckoutRepository<'a> {
    /// Create a new checkout repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Checkout records for a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn history_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CheckoutRecord>, RepositoryError> {
        let rows = sqlx::query_as::<_, CheckoutRecordRow>(
            "SELECT id, user_id, items, total_amount, created_at
             FROM checkout_history
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

// =============================================================================
// Transaction-scoped operations (checkout engine only)
// =============================================================================

/// Load a user's cart lines inside the checkout transaction.
pub(crate) async fn lines_for_user(
    conn: &mut PgConnection,
    user_id: UserId,
) -> Result<Vec<CartLine>, RepositoryError> {
    let rows = sqlx::query_as::<_, CartLineRow>(
        "SELECT id, user_id, product_id, quantity, created_at
         FROM cart_line
         WHERE user_id = $1
         ORDER BY created_at ASC, id ASC",
    )
    .bind(user_id.as_i32())
    .fetch_all(conn)
    .await?;

    rows.into_iter().map(CartLine::try_from).collect()
}

/// Lock and load the demanded products.
///
/// `ORDER BY id` fixes the lock-acquisition order, so two checkouts
/// touching overlapping product sets cannot deadlock against each other.
/// Products absent from the result were deleted; the caller detects that
/// by comparing against its demand map.
pub(crate) async fn products_for_update(
    conn: &mut PgConnection,
    product_ids: &[ProductId],
) -> Result<BTreeMap<ProductId, LockedProduct>, RepositoryError> {
    let ids: Vec<i32> = product_ids.iter().map(|id| id.as_i32()).collect();

    let rows = sqlx::query_as::<_, LockedProductRow>(
        "SELECT id, price, stock
         FROM product
         WHERE id = ANY($1)
         ORDER BY id ASC
         FOR UPDATE",
    )
    .bind(ids)
    .fetch_all(conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let id = ProductId::new(row.id);
            (
                id,
                LockedProduct {
                    id,
                    price: row.price,
                    stock: row.stock,
                },
            )
        })
        .collect())
}

/// Decrement a locked product's stock.
pub(crate) async fn decrement_stock(
    conn: &mut PgConnection,
    product_id: ProductId,
    by: i32,
) -> Result<(), RepositoryError> {
    let result = sqlx::query("UPDATE product SET stock = stock - $2, updated_at = now() WHERE id = $1")
        .bind(product_id.as_i32())
        .bind(by)
        .execute(conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }

    Ok(())
}

/// Append the checkout record.
pub(crate) async fn insert_record(
    conn: &mut PgConnection,
    user_id: UserId,
    items: &[CheckoutItem],
    total_amount: Decimal,
) -> Result<CheckoutRecord, RepositoryError> {
    let row = sqlx::query_as::<_, CheckoutRecordRow>(
        "INSERT INTO checkout_history (user_id, items, total_amount)
         VALUES ($1, $2, $3)
         RETURNING id, user_id, items, total_amount, created_at",
    )
    .bind(user_id.as_i32())
    .bind(Json(items))
    .bind(total_amount)
    .fetch_one(conn)
    .await?;

    Ok(row.into())
}

/// Drain the user's cart.
pub(crate) async fn clear_cart(
    conn: &mut PgConnection,
    user_id: UserId,
) -> Result<u64, RepositoryError> {
    let result = sqlx::query("DELETE FROM cart_line WHERE user_id = $1")
        .bind(user_id.as_i32())
        .execute(conn)
        .await?;

    Ok(result.rows_affected())
}
