//! Shop repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use market_lane_core::{Email, ShopId, UserId};

use super::RepositoryError;
use crate::models::Shop;

/// Internal row type for shop queries.
///
/// Shared with the signup transaction in [`super::users`].
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ShopRow {
    pub(crate) id: i32,
    pub(crate) name: String,
    pub(crate) location: String,
    pub(crate) manager_id: Option<i32>,
    pub(crate) email: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
}

impl TryFrom<ShopRow> for Shop {
    type Error = RepositoryError;

    fn try_from(row: ShopRow) -> Result<Self, RepositoryError> {
        let email = row
            .email
            .as_deref()
            .map(Email::parse)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid shop email in database: {e}"))
            })?;

        Ok(Self {
            id: ShopId::new(row.id),
            name: row.name,
            location: row.location,
            manager_id: row.manager_id.map(UserId::new),
            email,
            created_at: row.created_at,
        })
    }
}

/// Internal row type for shop credential lookups.
#[derive(Debug, sqlx::FromRow)]
struct ShopWithHashRow {
    id: i32,
    name: String,
    location: String,
    manager_id: Option<i32>,
    email: Option<String>,
    created_at: DateTime<Utc>,
    password_hash: String,
}

const SHOP_COLUMNS: &str = "id, name, location, manager_id, email, created_at";

/// Repository for shop database operations.
pub struct ShopRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShopRepository<'a> {
    /// Create a new shop repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a shop by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ShopId) -> Result<Option<Shop>, RepositoryError> {
        let row = sqlx::query_as::<_, ShopRow>(&format!(
            "SELECT {SHOP_COLUMNS} FROM shop WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(Shop::try_from).transpose()
    }

    /// List all shops, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Shop>, RepositoryError> {
        let rows = sqlx::query_as::<_, ShopRow>(&format!(
            "SELECT {SHOP_COLUMNS} FROM shop ORDER BY created_at ASC, id ASC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Shop::try_from).collect()
    }

    /// Create a shop owned by a manager, with its own login credential.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the shop email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_for_manager(
        &self,
        name: &str,
        location: &str,
        email: &Email,
        password_hash: &str,
        manager_id: UserId,
    ) -> Result<Shop, RepositoryError> {
        let row = sqlx::query_as::<_, ShopRow>(&format!(
            "INSERT INTO shop (name, location, email, password_hash, manager_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {SHOP_COLUMNS}"
        ))
        .bind(name)
        .bind(location)
        .bind(email.as_str())
        .bind(password_hash)
        .bind(manager_id.as_i32())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("shop email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Shop::try_from(row)
    }

    /// Get a shop and its password hash by the shop's login email.
    ///
    /// Returns `None` if no shop carries the email or the shop has no
    /// credential.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(Shop, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, ShopWithHashRow>(
            "SELECT id, name, location, manager_id, email, created_at, password_hash
             FROM shop
             WHERE email = $1 AND password_hash IS NOT NULL",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(r) = row else {
            return Ok(None);
        };

        let hash = r.password_hash.clone();
        let shop = Shop::try_from(ShopRow {
            id: r.id,
            name: r.name,
            location: r.location,
            manager_id: r.manager_id,
            email: r.email,
            created_at: r.created_at,
        })?;

        Ok(Some((shop, hash)))
    }
}
