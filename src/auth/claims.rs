// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims, the request-scoped identity, and the issued session pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::roles::Role;

/// Fixed token type literal echoed in every [`SessionPair`].
pub const TOKEN_TYPE: &str = "Bearer";

/// Claims carried by a signed token.
///
/// The token kind is implicit in the claim set: access tokens carry `sub`
/// and `roles`, refresh tokens carry only the timestamps. Both kinds are
/// signed with the same process-wide key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: string form of the numeric account id (access tokens only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Granted roles (access tokens only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<Role>>,

    /// Issued-at, Unix seconds
    pub iat: i64,

    /// Expiry, Unix seconds
    pub exp: i64,
}

impl TokenClaims {
    /// Whether the token is expired at `now`. Expiry is a caller-side
    /// policy decision, not part of decoding (see `TokenCodec`).
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }
}

/// Authenticated identity derived from a validated token.
///
/// Constructed fresh for each request by the authentication resolver and
/// published into the request's extensions by the request gate. Roles come
/// from the account record, not the token, so a role change takes effect
/// on the next request rather than the next login.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Owning account id
    pub account_id: u64,
    /// Roles granted to the account
    pub roles: Vec<Role>,
}

impl Identity {
    /// Check if the identity has the required role.
    pub fn has_role(&self, required: Role) -> bool {
        self.roles.iter().any(|role| role.has_privilege(required))
    }

    /// Check if this identity is an admin.
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }
}

/// An issued access/refresh token pair.
///
/// Returned by login and by every successful reissue; never mutated, only
/// replaced wholesale by the next issuance.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionPair {
    /// Fixed literal, always `"Bearer"`
    pub token_type: String,
    /// Short-lived access token (carries subject and roles)
    pub access_token: String,
    /// Long-lived refresh token (timestamps only)
    pub refresh_token: String,
    /// Access-token lifetime in milliseconds, informational
    pub access_token_ttl_ms: i64,
}
