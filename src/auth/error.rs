// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::storage::DbError;

/// Authentication error type.
///
/// Covers the full session lifecycle: login, per-request token validation,
/// and the reissue protocol. Each variant maps to a stable `error_code`
/// string so clients can distinguish, for example, a garbage token from a
/// token that was never granted roles.
#[derive(Debug)]
pub enum AuthError {
    /// Protected route reached without a published identity
    MissingAuthToken,
    /// Token bytes fail structural validation
    MalformedToken,
    /// Token signature does not verify against the signing key
    InvalidSignature,
    /// Token has expired (strict validation mode only)
    TokenExpired,
    /// Valid signature, but the claims carry no roles
    MissingRolesClaim,
    /// Token subject does not resolve to a stored account
    AccountNotFound,
    /// Presented refresh token failed signature or expiry checks
    RefreshExpiredOrForged,
    /// Presented refresh token does not match the stored record
    RefreshMismatch,
    /// Credential mismatch at login (unknown email and wrong password
    /// share this code to avoid account enumeration)
    LoginFailed,
    /// Authenticated, but the role set does not permit the operation
    InsufficientPermissions,
    /// Internal error; detail is logged, never echoed to the caller
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthToken => "missing_auth_token",
            AuthError::MalformedToken => "malformed_token",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::MissingRolesClaim => "missing_roles_claim",
            AuthError::AccountNotFound => "account_not_found",
            AuthError::RefreshExpiredOrForged => "refresh_expired_or_forged",
            AuthError::RefreshMismatch => "refresh_mismatch",
            AuthError::LoginFailed => "login_failed",
            AuthError::InsufficientPermissions => "insufficient_permissions",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthToken
            | AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::MissingRolesClaim
            | AuthError::AccountNotFound
            | AuthError::RefreshExpiredOrForged
            | AuthError::RefreshMismatch
            | AuthError::LoginFailed => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAuthToken => write!(f, "Authentication token is required"),
            AuthError::MalformedToken => write!(f, "Token is malformed"),
            AuthError::InvalidSignature => write!(f, "Token signature is invalid"),
            AuthError::TokenExpired => write!(f, "Token has expired"),
            AuthError::MissingRolesClaim => write!(f, "Token carries no roles claim"),
            AuthError::AccountNotFound => write!(f, "Account does not exist"),
            AuthError::RefreshExpiredOrForged => {
                write!(f, "Refresh token is expired or invalid")
            }
            AuthError::RefreshMismatch => {
                write!(f, "Refresh token does not match the active session")
            }
            AuthError::LoginFailed => write!(f, "Login failed"),
            AuthError::InsufficientPermissions => {
                write!(f, "Insufficient permissions for this operation")
            }
            AuthError::Internal(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<DbError> for AuthError {
    fn from(err: DbError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Internal detail stays in the logs; the caller sees a generic message.
        let message = if let AuthError::Internal(detail) = &self {
            tracing::error!(error = %detail, "internal authentication error");
            "Internal authentication error".to_string()
        } else {
            self.to_string()
        };
        let body = Json(AuthErrorBody {
            error: message,
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn missing_auth_returns_401() {
        let response = AuthError::MissingAuthToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error_code"], "missing_auth_token");
    }

    #[tokio::test]
    async fn refresh_mismatch_returns_401_with_distinct_code() {
        let response = AuthError::RefreshMismatch.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error_code"], "refresh_mismatch");
    }

    #[tokio::test]
    async fn insufficient_permissions_returns_403() {
        let response = AuthError::InsufficientPermissions.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn internal_error_hides_detail() {
        let response = AuthError::Internal("disk on fire".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error"], "Internal authentication error");
    }
}
