//! Authentication service.
//!
//! Signup, login, manager provisioning, and shop-level login. Passwords are
//! hashed with Argon2id; successful authentication issues a bearer token
//! via [`TokenService`].

mod error;
pub mod tokens;

pub use error::AuthError;
pub use tokens::{Claims, TokenError, TokenService};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use market_lane_core::{Email, Role, UserId};

use crate::db::users::UserRepository;
use crate::db::{RepositoryError, ShopRepository};
use crate::models::{Shop, User};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// An authenticated account with its freshly issued token.
#[derive(Debug)]
pub struct Session {
    /// The authenticated user.
    pub user: User,
    /// The user's shop, where affiliated.
    pub shop: Option<Shop>,
    /// The issued bearer token.
    pub token: String,
}

/// Authentication service.
///
/// Handles registration, login, and account provisioning.
pub struct AuthService<'a> {
    pool: &'a PgPool,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tokens: &'a TokenService) -> Self {
        Self { pool, tokens }
    }

    /// Register a new user together with their shop.
    ///
    /// The shop and user rows are created in one transaction; a failed
    /// signup leaves neither behind. The new account always gets the
    /// `user` role - admins are provisioned through the CLI.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        shop_name: &str,
        shop_location: &str,
    ) -> Result<Session, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let (user, shop) = UserRepository::new(self.pool)
            .create_with_shop(name, &email, &password_hash, shop_name, shop_location)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        let token = self.tokens.issue(user.id, user.role, user.shop_id)?;
        tracing::info!(user_id = %user.id, shop_id = %shop.id, "user registered");

        Ok(Session {
            user,
            shop: Some(shop),
            token,
        })
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is
    /// wrong. The message does not distinguish an unknown email from a
    /// wrong password.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = Email::parse(email)?;

        let (user, password_hash) = UserRepository::new(self.pool)
            .get_with_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        let shop = match user.shop_id {
            Some(shop_id) => ShopRepository::new(self.pool).get_by_id(shop_id).await?,
            None => None,
        };

        let token = self.tokens.issue(user.id, user.role, user.shop_id)?;

        Ok(Session { user, shop, token })
    }

    /// Provision a manager account (admin-only path; the role check happens
    /// at the guard).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserAlreadyExists` if the email is taken.
    pub async fn create_manager(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        self.create_with_role(name, email, password, Role::Manager)
            .await
    }

    /// Provision an account with an explicit role. Used by `create_manager`
    /// and by the CLI for admin accounts.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserAlreadyExists` if the email is taken.
    pub async fn create_with_role(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let user = UserRepository::new(self.pool)
            .create_with_role(name, &email, &password_hash, role)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, role = %user.role, "account provisioned");
        Ok(user)
    }

    /// Login with a shop's own credential.
    ///
    /// Issues a manager-scoped token carrying the shop id, so subsequent
    /// manager operations are bound to this shop.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ShopNotFound` if no shop carries the email.
    /// Returns `AuthError::InvalidCredentials` on a wrong password or a
    /// shop without an owning manager.
    pub async fn shop_login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = Email::parse(email)?;

        let (shop, password_hash) = ShopRepository::new(self.pool)
            .get_with_password_hash(&email)
            .await?
            .ok_or(AuthError::ShopNotFound)?;

        verify_password(password, &password_hash)?;

        let manager_id = shop.manager_id.ok_or(AuthError::InvalidCredentials)?;
        let manager = UserRepository::new(self.pool)
            .get_by_id(manager_id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let token = self.tokens.issue(manager.id, Role::Manager, Some(shop.id))?;

        Ok(Session {
            user: manager,
            shop: Some(shop),
            token,
        })
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn get_user(&self, user_id: UserId) -> Result<User, AuthError> {
        UserRepository::new(self.pool)
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_too_short() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_validate_password_accepts_minimum() {
        assert!(validate_password("12345678").is_ok());
    }

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(matches!(
            verify_password("whatever", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
