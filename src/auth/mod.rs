//! Caller identity seam.
//!
//! Authentication and cookie handling live in the fronting layer, which is
//! trusted to stamp the authenticated user id onto each request it proxies
//! through. This module only resolves that identity.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::api::ApiError;

/// Header carrying the authenticated user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    id: String,
}

impl CurrentUser {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|id| Self { id: id.to_string() })
            .ok_or_else(|| ApiError::unauthorized("missing user identity"))
    }
}
