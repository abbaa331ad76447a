//! Authentication guard: extractors for bearer-token identity.
//!
//! The token is verified exactly once here. Handlers receive the decoded
//! identity, role, and shop affiliation as an explicit [`AuthUser`]
//! parameter and never re-derive claims themselves.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use market_lane_core::{Role, ShopId, UserId};

use crate::state::AppState;

/// The authenticated caller, as decoded from the bearer token.
///
/// A capability descriptor: everything a handler or the checkout engine
/// needs to know about who is calling.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    /// The caller's user ID.
    pub id: UserId,
    /// The caller's role.
    pub role: Role,
    /// Shop affiliation carried in the token, where applicable.
    pub shop_id: Option<ShopId>,
}

/// Rejection returned when authentication or authorization fails.
#[derive(Debug)]
pub enum AuthRejection {
    /// No `Authorization: Bearer` header was provided.
    Unauthenticated,
    /// The token failed signature, structure, or expiry checks.
    InvalidCredential,
    /// The caller is authenticated but lacks the required role.
    Forbidden,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthenticated => (StatusCode::UNAUTHORIZED, "No token provided"),
            Self::InvalidCredential => (StatusCode::UNAUTHORIZED, "Invalid token"),
            Self::Forbidden => (StatusCode::FORBIDDEN, "Access denied"),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthRejection::Unauthenticated)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AuthRejection::Unauthenticated)?;

        let claims = state
            .tokens()
            .verify(token)
            .map_err(|_| AuthRejection::InvalidCredential)?;

        Ok(Self {
            id: UserId::new(claims.sub),
            role: claims.role,
            shop_id: claims.shop_id.map(ShopId::new),
        })
    }
}

/// Extractor that additionally requires the `admin` role.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role == Role::Admin {
            Ok(Self(user))
        } else {
            Err(AuthRejection::Forbidden)
        }
    }
}

/// Extractor that additionally requires the `manager` role.
pub struct RequireManager(pub AuthUser);

impl FromRequestParts<AppState> for RequireManager {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role == Role::Manager {
            Ok(Self(user))
        } else {
            Err(AuthRejection::Forbidden)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_status_codes() {
        assert_eq!(
            AuthRejection::Unauthenticated.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthRejection::InvalidCredential.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthRejection::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }
}
