//! Request middleware and extractors.

pub mod auth;
pub mod request_id;

pub use auth::{AuthRejection, AuthUser, RequireAdmin, RequireManager};
pub use request_id::request_id_middleware;
