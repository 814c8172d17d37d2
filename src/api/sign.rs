// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signup, login, and token reissue endpoints.
//!
//! These are the three routes that work without an authenticated
//! identity. Login failures deliberately collapse "unknown email" and
//! "wrong password" into one error code so the endpoint cannot be used to
//! enumerate accounts.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;

use crate::{
    auth::{
        password::{hash_password, verify_password},
        AuthError, SessionManager, SessionPair,
    },
    error::ApiError,
    models::{LoginRequest, ReissueRequest, SignupRequest, SignupResponse},
    state::AppState,
    storage::{AccountRepository, NewAccount},
};

#[utoipa::path(
    post,
    path = "/api/signup",
    request_body = SignupRequest,
    tag = "Sign",
    responses(
        (status = 201, description = "Account created", body = SignupResponse),
        (status = 400, description = "Invalid signup fields"),
        (status = 409, description = "Email already registered"),
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    validate_signup(&request)?;

    let password_hash = hash_password(&request.password).map_err(|err| {
        tracing::error!(error = %err, "password hashing failed");
        ApiError::internal()
    })?;

    let account = AccountRepository::new(&state.db)
        .create(NewAccount {
            email: request.email,
            password_hash,
            name: request.name,
            nickname: request.nickname,
        })
        .map_err(|err| match err {
            crate::storage::DbError::AlreadyExists(_) => {
                ApiError::conflict("An account with this email already exists")
            }
            other => other.into(),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            account_id: account.id,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    tag = "Sign",
    responses(
        (status = 200, description = "Session pair issued", body = SessionPair),
        (status = 401, description = "Login failed"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionPair>, AuthError> {
    let account = AccountRepository::new(&state.db)
        .find_by_email(&request.email)?
        .ok_or(AuthError::LoginFailed)?;

    if !verify_password(&request.password, &account.password_hash) {
        return Err(AuthError::LoginFailed);
    }

    let sessions = SessionManager::new(&state.tokens, &state.db);
    let pair = sessions.create_session(&account, Utc::now())?;
    Ok(Json(pair))
}

#[utoipa::path(
    post,
    path = "/api/reissue",
    request_body = ReissueRequest,
    tag = "Sign",
    responses(
        (status = 200, description = "New session pair issued", body = SessionPair),
        (status = 401, description = "Reissue rejected; re-authenticate with credentials"),
    )
)]
pub async fn reissue(
    State(state): State<AppState>,
    Json(request): Json<ReissueRequest>,
) -> Result<Json<SessionPair>, AuthError> {
    let sessions = SessionManager::new(&state.tokens, &state.db);
    let pair = sessions.reissue(&request.access_token, &request.refresh_token, Utc::now())?;
    Ok(Json(pair))
}

fn validate_signup(request: &SignupRequest) -> Result<(), ApiError> {
    if !request.email.contains('@') {
        return Err(ApiError::bad_request("email must be a valid address"));
    }
    if request.password.len() < 8 {
        return Err(ApiError::bad_request(
            "password must be at least 8 characters",
        ));
    }
    if request.name.trim().is_empty() || request.nickname.trim().is_empty() {
        return Err(ApiError::bad_request("name and nickname must not be blank"));
    }
    Ok(())
}
