// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless token-based sessions for the Mealmeet API.
//!
//! ## Session Flow
//!
//! 1. Client logs in with email and password
//! 2. Server mints an access/refresh token pair (HS256-signed JWTs) and
//!    persists the refresh token, keeping exactly one live refresh token
//!    per account
//! 3. Client sends `X-AUTH-TOKEN: <access token>` on each request; the
//!    request gate validates it and publishes the resolved identity
//! 4. When the access token expires, the client calls the reissue
//!    endpoint with both tokens; the server rotates the refresh token and
//!    returns a fresh pair
//!
//! ## Security
//!
//! - Tokens are signed with a process-wide secret loaded at startup;
//!   rotating the secret invalidates every outstanding token
//! - Refresh rotation is an atomic compare-and-swap in storage, so a
//!   replayed refresh token always fails with a mismatch
//! - The reissue path accepts an expired access token, but only for
//!   identity extraction; its signature is still verified

pub mod claims;
pub mod codec;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod roles;
pub mod session;

pub use claims::{Identity, SessionPair, TokenClaims};
pub use codec::{TokenCodec, TokenConfig, TokenKind};
pub use error::AuthError;
pub use extractor::{AdminOnly, Auth, OptionalAuth};
pub use middleware::AUTH_TOKEN_HEADER;
pub use roles::Role;
pub use session::SessionManager;
