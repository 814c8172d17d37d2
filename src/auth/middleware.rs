// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request gate: per-request token validation middleware.
//!
//! Runs ahead of every handler. Reads the access token from the
//! `X-AUTH-TOKEN` header, validates it strictly (signature, structure,
//! expiry), resolves the identity, and publishes it into the request's
//! extensions. The gate itself NEVER rejects a request: a missing or
//! invalid token simply leaves the request anonymous, and the extractors
//! in `extractor.rs` decide downstream whether anonymous access is
//! permitted for a given route.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use super::session::SessionManager;
use crate::state::AppState;

/// Fixed request header carrying the access token.
pub const AUTH_TOKEN_HEADER: &str = "X-AUTH-TOKEN";

/// Authentication middleware function.
///
/// Apply with `axum::middleware::from_fn_with_state(state, request_gate)`
/// on the full router, before any authorization decision.
pub async fn request_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTH_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());

    if let Some(token) = token {
        let now = Utc::now();
        let sessions = SessionManager::new(&state.tokens, &state.db);
        match state
            .tokens
            .decode_valid(token, now)
            .and_then(|claims| sessions.resolve(&claims))
        {
            Ok(identity) => {
                request.extensions_mut().insert(identity);
            }
            Err(err) => {
                // The request continues unauthenticated; protected routes
                // reject it downstream.
                tracing::debug!(error = %err, path = %request.uri().path(), "token rejected");
            }
        }
    }

    next.run(request).await
}
