// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for authenticated identities.
//!
//! The request gate (see `middleware.rs`) publishes a validated
//! [`Identity`] into the request extensions; these extractors are where
//! the authorization decision actually happens. Use `Auth` in handlers to
//! require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(identity): Auth) -> impl IntoResponse {
//!     // identity.account_id, identity.roles
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::claims::Identity;
use super::error::AuthError;

/// Extractor that requires an authenticated identity.
///
/// Rejects with 401 `missing_auth_token` when the gate published nothing
/// (the header was absent, or the token failed validation).
pub struct Auth(pub Identity);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(Auth)
            .ok_or(AuthError::MissingAuthToken)
    }
}

/// Extractor that requires an admin identity.
pub struct AdminOnly(pub Identity);

impl<S> FromRequestParts<S> for AdminOnly
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Auth(identity) = Auth::from_request_parts(parts, state).await?;

        if !identity.is_admin() {
            return Err(AuthError::InsufficientPermissions);
        }

        Ok(AdminOnly(identity))
    }
}

/// Optional authentication extractor.
///
/// Returns `None` for anonymous requests instead of rejecting.
pub struct OptionalAuth(pub Option<Identity>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuth(parts.extensions.get::<Identity>().cloned()))
    }
}
