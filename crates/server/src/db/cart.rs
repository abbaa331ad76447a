//! Cart repository for database operations.
//!
//! Cart lines are append-only from the client's point of view: repeated
//! additions of the same product create separate rows. The checkout engine
//! merges them when it sums demand per product.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use market_lane_core::{CartLineId, ProductId, Quantity, UserId};

use super::RepositoryError;
use crate::models::{CartLine, CartLineWithProduct};

/// Internal row type for cart-line queries.
///
/// Shared with the checkout engine's transaction-scoped loads in
/// [`super::checkout`].
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CartLineRow {
    pub(crate) id: i32,
    pub(crate) user_id: i32,
    pub(crate) product_id: i32,
    pub(crate) quantity: i32,
    pub(crate) created_at: DateTime<Utc>,
}

impl TryFrom<CartLineRow> for CartLine {
    type Error = RepositoryError;

    fn try_from(row: CartLineRow) -> Result<Self, RepositoryError> {
        let quantity = Quantity::new(row.quantity).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid cart quantity in database: {e}"))
        })?;

        Ok(Self {
            id: CartLineId::new(row.id),
            user_id: UserId::new(row.user_id),
            product_id: ProductId::new(row.product_id),
            quantity,
            created_at: row.created_at,
        })
    }
}

/// Internal row type for the cart view join.
#[derive(Debug, sqlx::FromRow)]
struct CartLineWithProductRow {
    line_id: i32,
    product_id: i32,
    name: String,
    price: Decimal,
    stock: i32,
    quantity: i32,
}

impl TryFrom<CartLineWithProductRow> for CartLineWithProduct {
    type Error = RepositoryError;

    fn try_from(row: CartLineWithProductRow) -> Result<Self, RepositoryError> {
        let quantity = Quantity::new(row.quantity).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid cart quantity in database: {e}"))
        })?;

        Ok(Self {
            line_id: CartLineId::new(row.line_id),
            product_id: ProductId::new(row.product_id),
            name: row.name,
            price: row.price,
            stock: row.stock,
            quantity,
        })
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Append a cart line. No dedup: a second add of the same product
    /// creates a second row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (including
    /// a foreign-key violation for a product deleted concurrently).
    pub async fn add_line(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<CartLine, RepositoryError> {
        let row = sqlx::query_as::<_, CartLineRow>(
            "INSERT INTO cart_line (user_id, product_id, quantity)
             VALUES ($1, $2, $3)
             RETURNING id, user_id, product_id, quantity, created_at",
        )
        .bind(user_id.as_i32())
        .bind(product_id.as_i32())
        .bind(quantity.get())
        .fetch_one(self.pool)
        .await?;

        CartLine::try_from(row)
    }

    /// The user's cart joined with current product name, price, and stock,
    /// in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines_with_products(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CartLineWithProduct>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLineWithProductRow>(
            "SELECT c.id AS line_id, p.id AS product_id, p.name, p.price, p.stock, c.quantity
             FROM cart_line c
             JOIN product p ON p.id = c.product_id
             WHERE c.user_id = $1
             ORDER BY c.created_at ASC, c.id ASC",
        )
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(CartLineWithProduct::try_from).collect()
    }
}
