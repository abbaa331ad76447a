//! Bearer-token issuance and verification.
//!
//! Tokens are HS256 JWTs carrying the caller's identity, role, and optional
//! shop affiliation. They are verified exactly once, at the authentication
//! guard; handlers receive the decoded claims as an explicit parameter and
//! never re-derive them.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use market_lane_core::{Role, ShopId, UserId};

/// Errors that can occur issuing or verifying tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signing failed.
    #[error("failed to sign token")]
    Sign(#[source] jsonwebtoken::errors::Error),

    /// Signature, structure, or expiry check failed. Deliberately opaque.
    #[error("invalid or expired token")]
    Verify,
}

/// The claims carried by a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: i32,
    /// Account role.
    pub role: Role,
    /// Shop affiliation, where applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop_id: Option<i32>,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Expiry (seconds since epoch).
    pub exp: i64,
}

/// Issues and verifies bearer tokens with a shared HS256 secret.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    /// Create a token service from the signing secret and lifetime.
    #[must_use]
    pub fn new(secret: &SecretString, ttl_days: i64) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        let validation = Validation::new(Algorithm::HS256);

        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            validation,
            ttl: Duration::days(ttl_days),
        }
    }

    /// Issue a token for the given identity.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Sign` if encoding fails.
    pub fn issue(
        &self,
        user_id: UserId,
        role: Role,
        shop_id: Option<ShopId>,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.as_i32(),
            role,
            shop_id: shop_id.map(|id| id.as_i32()),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(TokenError::Sign)
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Verify` for any malformed, tampered, or expired
    /// token. The cause is not distinguished to the caller.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Verify)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(&SecretString::from("0123456789abcdef0123456789abcdef"), 7)
    }

    #[test]
    fn test_issue_verify_roundtrip() {
        let svc = service();
        let token = svc
            .issue(UserId::new(42), Role::Manager, Some(ShopId::new(7)))
            .unwrap();

        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, Role::Manager);
        assert_eq!(claims.shop_id, Some(7));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_shop_id_absent_for_plain_users() {
        let svc = service();
        let token = svc.issue(UserId::new(1), Role::User, None).unwrap();
        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims.shop_id, None);
    }

    #[test]
    fn test_expired_token_rejected() {
        // Negative lifetime: the token is already expired when issued.
        let svc =
            TokenService::new(&SecretString::from("0123456789abcdef0123456789abcdef"), -1);
        let token = svc.issue(UserId::new(1), Role::User, None).unwrap();

        assert!(matches!(svc.verify(&token), Err(TokenError::Verify)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = service().issue(UserId::new(1), Role::User, None).unwrap();

        let other =
            TokenService::new(&SecretString::from("ffffffffffffffffffffffffffffffff"), 7);
        assert!(matches!(other.verify(&token), Err(TokenError::Verify)));
    }

    #[test]
    fn test_garbage_rejected() {
        let svc = service();
        assert!(svc.verify("not-a-token").is_err());
        assert!(svc.verify("").is_err());
        assert!(svc.verify("aaa.bbb.ccc").is_err());
    }

    #[test]
    fn test_seven_day_lifetime() {
        let svc = service();
        let token = svc.issue(UserId::new(1), Role::User, None).unwrap();
        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }
}
