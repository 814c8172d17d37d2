// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{AccountResponse, UpdateNicknameRequest},
    state::AppState,
    storage::AccountRepository,
};

/// Get the calling account's profile.
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Account profile", body = AccountResponse),
        (status = 401, description = "Unauthorized"),
    )
)]
pub async fn get_current_account(
    Auth(identity): Auth,
    State(state): State<AppState>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = AccountRepository::new(&state.db)
        .find_by_id(identity.account_id)?
        .ok_or_else(|| ApiError::not_found("Account not found"))?;
    Ok(Json(account.into()))
}

#[utoipa::path(
    get,
    path = "/api/users/id/{account_id}",
    params(("account_id" = u64, Path, description = "Account id to look up")),
    tag = "Users",
    responses(
        (status = 200, body = AccountResponse),
        (status = 404, description = "No such account"),
    )
)]
pub async fn find_by_id(
    Auth(_identity): Auth,
    Path(account_id): Path<u64>,
    State(state): State<AppState>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = AccountRepository::new(&state.db)
        .find_by_id(account_id)?
        .ok_or_else(|| ApiError::not_found("Account not found"))?;
    Ok(Json(account.into()))
}

#[utoipa::path(
    get,
    path = "/api/users/email/{email}",
    params(("email" = String, Path, description = "Account email to look up")),
    tag = "Users",
    responses(
        (status = 200, body = AccountResponse),
        (status = 404, description = "No such account"),
    )
)]
pub async fn find_by_email(
    Auth(_identity): Auth,
    Path(email): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = AccountRepository::new(&state.db)
        .find_by_email(&email)?
        .ok_or_else(|| ApiError::not_found("Account not found"))?;
    Ok(Json(account.into()))
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses((status = 200, body = [AccountResponse]))
)]
pub async fn list_accounts(
    Auth(_identity): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    let accounts = AccountRepository::new(&state.db).list_all()?;
    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

/// Change the calling account's nickname.
#[utoipa::path(
    put,
    path = "/api/users/me/nickname",
    request_body = UpdateNicknameRequest,
    tag = "Users",
    responses(
        (status = 200, body = AccountResponse),
        (status = 400, description = "Blank nickname"),
    )
)]
pub async fn update_nickname(
    Auth(identity): Auth,
    State(state): State<AppState>,
    Json(request): Json<UpdateNicknameRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    if request.nickname.trim().is_empty() {
        return Err(ApiError::bad_request("nickname must not be blank"));
    }

    let account =
        AccountRepository::new(&state.db).update_nickname(identity.account_id, &request.nickname)?;
    Ok(Json(account.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Identity, Role, TokenCodec, TokenConfig};
    use crate::storage::{Database, NewAccount, StoredAccount};
    use tempfile::TempDir;

    fn test_state() -> (AppState, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let db = Database::open(&dir.path().join("test.redb")).expect("open db");
        let codec = TokenCodec::new(&TokenConfig {
            secret: "test-signing-secret".to_string(),
            access_token_ttl_ms: 3_600_000,
            refresh_token_ttl_ms: 14 * 24 * 3_600_000,
        });
        (AppState::new(db, codec), dir)
    }

    fn seed_account(state: &AppState, email: &str) -> StoredAccount {
        AccountRepository::new(&state.db)
            .create(NewAccount {
                email: email.to_string(),
                password_hash: "$argon2id$fake".to_string(),
                name: "June Kim".to_string(),
                nickname: "june".to_string(),
            })
            .expect("create account")
    }

    fn identity_for(account: &StoredAccount) -> Identity {
        Identity {
            account_id: account.id,
            roles: vec![Role::User],
        }
    }

    #[tokio::test]
    async fn me_returns_own_profile() {
        let (state, _dir) = test_state();
        let account = seed_account(&state, "june@example.com");

        let Json(response) =
            get_current_account(Auth(identity_for(&account)), State(state.clone()))
                .await
                .expect("me succeeds");
        assert_eq!(response.account_id, account.id);
        assert_eq!(response.email, "june@example.com");
    }

    #[tokio::test]
    async fn lookup_by_id_and_email() {
        let (state, _dir) = test_state();
        let account = seed_account(&state, "june@example.com");
        let caller = identity_for(&account);

        let Json(by_id) = find_by_id(
            Auth(caller.clone()),
            Path(account.id),
            State(state.clone()),
        )
        .await
        .expect("lookup by id succeeds");
        assert_eq!(by_id.account_id, account.id);

        let Json(by_email) = find_by_email(
            Auth(caller.clone()),
            Path("june@example.com".to_string()),
            State(state.clone()),
        )
        .await
        .expect("lookup by email succeeds");
        assert_eq!(by_email.account_id, account.id);

        let missing = find_by_id(Auth(caller), Path(999), State(state))
            .await
            .expect_err("missing account 404s");
        assert_eq!(missing.status, axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_returns_all_accounts() {
        let (state, _dir) = test_state();
        let first = seed_account(&state, "a@example.com");
        seed_account(&state, "b@example.com");

        let Json(accounts) = list_accounts(Auth(identity_for(&first)), State(state))
            .await
            .expect("list succeeds");
        assert_eq!(accounts.len(), 2);
    }

    #[tokio::test]
    async fn update_nickname_rejects_blank_and_persists_value() {
        let (state, _dir) = test_state();
        let account = seed_account(&state, "june@example.com");
        let caller = identity_for(&account);

        let err = update_nickname(
            Auth(caller.clone()),
            State(state.clone()),
            Json(UpdateNicknameRequest {
                nickname: "   ".to_string(),
            }),
        )
        .await
        .expect_err("blank nickname rejected");
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);

        let Json(updated) = update_nickname(
            Auth(caller),
            State(state.clone()),
            Json(UpdateNicknameRequest {
                nickname: "lunch-june".to_string(),
            }),
        )
        .await
        .expect("update succeeds");
        assert_eq!(updated.nickname, "lunch-june");
    }
}
