//! Product repository for database operations.
//!
//! Product creation appends a `product_history` entry in the same
//! transaction so the append-only log never disagrees with the catalog.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use market_lane_core::{ProductHistoryId, ProductId, ShopId, UserId};

use super::RepositoryError;
use crate::models::{Product, ProductHistoryEntry};

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    owner_id: i32,
    shop_id: Option<i32>,
    name: String,
    price: Decimal,
    stock: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            owner_id: UserId::new(row.owner_id),
            shop_id: row.shop_id.map(ShopId::new),
            name: row.name,
            price: row.price,
            stock: row.stock,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Internal row type for product-history queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductHistoryRow {
    id: i32,
    user_id: i32,
    product_name: String,
    price: Decimal,
    quantity: i32,
    created_at: DateTime<Utc>,
}

impl From<ProductHistoryRow> for ProductHistoryEntry {
    fn from(row: ProductHistoryRow) -> Self {
        Self {
            id: ProductHistoryId::new(row.id),
            user_id: UserId::new(row.user_id),
            product_name: row.product_name,
            price: row.price,
            quantity: row.quantity,
            created_at: row.created_at,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, owner_id, shop_id, name, price, stock, created_at, updated_at";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a product and append its history entry in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; neither
    /// row exists afterwards in that case.
    pub async fn create_with_history(
        &self,
        owner_id: UserId,
        shop_id: Option<ShopId>,
        name: &str,
        price: Decimal,
        stock: i32,
    ) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO product (owner_id, shop_id, name, price, stock)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(owner_id.as_i32())
        .bind(shop_id.map(|id| id.as_i32()))
        .bind(name)
        .bind(price)
        .bind(stock)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO product_history (user_id, product_name, price, quantity)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(owner_id.as_i32())
        .bind(name)
        .bind(price)
        .bind(stock)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// List products owned by a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_owner(&self, owner_id: UserId) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product
             WHERE owner_id = $1
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(owner_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List products belonging to a shop, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_shop(&self, shop_id: ShopId) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product
             WHERE shop_id = $1
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(shop_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Delete a product, scoped to its owner.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist
    /// or belongs to someone else.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_owned(
        &self,
        owner_id: UserId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM product WHERE id = $1 AND owner_id = $2")
            .bind(product_id.as_i32())
            .bind(owner_id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Product-addition history for a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn history_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ProductHistoryEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductHistoryRow>(
            "SELECT id, user_id, product_name, price, quantity, created_at
             FROM product_history
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
