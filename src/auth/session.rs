// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session issuance, identity resolution, and refresh rotation.
//!
//! ## Reissue Flow
//!
//! A client whose access token has expired presents both tokens:
//!
//! 1. The refresh token must pass signature AND expiry checks.
//! 2. The access token must pass signature checks only. It is expected
//!    to be expired here, and is trusted purely for identity extraction.
//! 3. The subject is resolved to an account.
//! 4. The presented refresh token is compared by exact value against the
//!    stored record for that account.
//! 5. On match, a new pair is minted and the stored record is atomically
//!    swapped to the new refresh token. The old one never matches again.
//!
//! Storage-layer atomicity of the swap is what makes concurrent reissue
//! safe: of two racing attempts, one wins the compare-and-swap and the
//! other observes `RefreshMismatch`.

use chrono::{DateTime, Utc};

use super::claims::{Identity, SessionPair, TokenClaims, TOKEN_TYPE};
use super::codec::{TokenCodec, TokenKind};
use super::error::AuthError;
use crate::storage::{AccountRepository, Database, RefreshTokenRepository, StoredAccount};

/// Orchestrates the token codec and the storage layer for the whole
/// session lifecycle: login issuance, per-request resolution, reissue.
pub struct SessionManager<'a> {
    codec: &'a TokenCodec,
    db: &'a Database,
}

impl<'a> SessionManager<'a> {
    /// Create a new SessionManager.
    pub fn new(codec: &'a TokenCodec, db: &'a Database) -> Self {
        Self { codec, db }
    }

    /// Mint an access/refresh pair for an authenticated account and
    /// persist the refresh token.
    ///
    /// Both tokens are minted from the same `now` so their issued-at
    /// claims agree. This is the only path that creates a refresh-token
    /// record; [`Self::reissue`] only rotates an existing one. A repeat
    /// login overwrites the record, which invalidates the previous
    /// refresh token (single active session per account).
    pub fn create_session(
        &self,
        account: &StoredAccount,
        now: DateTime<Utc>,
    ) -> Result<SessionPair, AuthError> {
        let subject = account.id.to_string();
        let access_token =
            self.codec
                .issue(TokenKind::Access, &subject, Some(&account.roles), now)?;
        let refresh_token = self.codec.issue(TokenKind::Refresh, &subject, None, now)?;

        RefreshTokenRepository::new(self.db).put(account.id, &refresh_token)?;

        Ok(SessionPair {
            token_type: TOKEN_TYPE.to_string(),
            access_token,
            refresh_token,
            access_token_ttl_ms: self.codec.access_token_ttl_ms(),
        })
    }

    /// Resolve validated claims into a request identity.
    ///
    /// A cryptographically valid token without a roles claim was never
    /// granted roles; that is a distinct failure from a malformed token.
    /// Roles on the returned identity come from the account record, not
    /// the token.
    pub fn resolve(&self, claims: &TokenClaims) -> Result<Identity, AuthError> {
        let account = self.resolve_account(claims)?;
        Ok(Identity {
            account_id: account.id,
            roles: account.roles,
        })
    }

    /// Reissue a token pair from an expired access token plus a live
    /// refresh token, rotating the stored record.
    pub fn reissue(
        &self,
        access_token: &str,
        refresh_token: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionPair, AuthError> {
        // The refresh token must be genuinely live.
        self.codec
            .decode_valid(refresh_token, now)
            .map_err(|_| AuthError::RefreshExpiredOrForged)?;

        // The access token is only required to be well-signed; expiry is
        // deliberately not checked. Its job here is identity extraction.
        let access_claims = self.codec.decode(access_token)?;
        let account = self.resolve_account(&access_claims)?;

        let refresh_tokens = RefreshTokenRepository::new(self.db);
        let stored = refresh_tokens
            .get(account.id)?
            .ok_or(AuthError::RefreshMismatch)?;
        if stored != refresh_token {
            return Err(AuthError::RefreshMismatch);
        }

        let subject = account.id.to_string();
        let new_access =
            self.codec
                .issue(TokenKind::Access, &subject, Some(&account.roles), now)?;
        let new_refresh = self.codec.issue(TokenKind::Refresh, &subject, None, now)?;

        // Atomic swap: a concurrent reissue that already rotated the
        // record makes this fail, and the loser reports a mismatch.
        if !refresh_tokens.rotate(account.id, refresh_token, &new_refresh)? {
            return Err(AuthError::RefreshMismatch);
        }

        Ok(SessionPair {
            token_type: TOKEN_TYPE.to_string(),
            access_token: new_access,
            refresh_token: new_refresh,
            access_token_ttl_ms: self.codec.access_token_ttl_ms(),
        })
    }

    fn resolve_account(&self, claims: &TokenClaims) -> Result<StoredAccount, AuthError> {
        if claims.roles.is_none() {
            return Err(AuthError::MissingRolesClaim);
        }
        let subject = claims.sub.as_deref().ok_or(AuthError::MalformedToken)?;
        let account_id: u64 = subject.parse().map_err(|_| AuthError::MalformedToken)?;

        AccountRepository::new(self.db)
            .find_by_id(account_id)?
            .ok_or(AuthError::AccountNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::codec::TokenConfig;
    use crate::auth::Role;
    use crate::storage::NewAccount;
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    const SECRET: &str = "test-signing-secret";

    fn test_codec() -> TokenCodec {
        TokenCodec::new(&TokenConfig {
            secret: SECRET.to_string(),
            access_token_ttl_ms: 3_600_000,
            refresh_token_ttl_ms: 14 * 24 * 3_600_000,
        })
    }

    fn test_db() -> (Database, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let db = Database::open(&dir.path().join("test.redb")).expect("open db");
        (db, dir)
    }

    fn seed_account(db: &Database) -> StoredAccount {
        AccountRepository::new(db)
            .create(NewAccount {
                email: "june@example.com".to_string(),
                password_hash: "$argon2id$fake".to_string(),
                name: "June Kim".to_string(),
                nickname: "june".to_string(),
            })
            .expect("create account")
    }

    fn t0() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn create_session_persists_refresh_token() {
        let (db, _dir) = test_db();
        let codec = test_codec();
        let account = seed_account(&db);
        let sessions = SessionManager::new(&codec, &db);

        let pair = sessions.create_session(&account, t0()).unwrap();
        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.access_token_ttl_ms, 3_600_000);

        let stored = RefreshTokenRepository::new(&db)
            .get(account.id)
            .unwrap()
            .unwrap();
        assert_eq!(stored, pair.refresh_token);
    }

    #[test]
    fn resolve_returns_account_roles() {
        let (db, _dir) = test_db();
        let codec = test_codec();
        let account = seed_account(&db);
        let sessions = SessionManager::new(&codec, &db);

        let pair = sessions.create_session(&account, t0()).unwrap();
        let claims = codec.decode(&pair.access_token).unwrap();
        let identity = sessions.resolve(&claims).unwrap();

        assert_eq!(identity.account_id, account.id);
        assert_eq!(identity.roles, vec![Role::User]);
    }

    #[test]
    fn resolve_without_roles_claim_fails_distinctly() {
        let (db, _dir) = test_db();
        let codec = test_codec();
        let account = seed_account(&db);
        let sessions = SessionManager::new(&codec, &db);

        // Well-signed token whose claims omit roles entirely.
        let claims = TokenClaims {
            sub: Some(account.id.to_string()),
            roles: None,
            iat: t0().timestamp(),
            exp: t0().timestamp() + 3600,
        };
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let decoded = codec.decode(&token).unwrap();
        assert!(matches!(
            sessions.resolve(&decoded),
            Err(AuthError::MissingRolesClaim)
        ));
    }

    #[test]
    fn resolve_unknown_subject_fails_with_account_not_found() {
        let (db, _dir) = test_db();
        let codec = test_codec();
        let sessions = SessionManager::new(&codec, &db);

        let token = codec
            .issue(TokenKind::Access, "999", Some(&[Role::User]), t0())
            .unwrap();
        let claims = codec.decode(&token).unwrap();
        assert!(matches!(
            sessions.resolve(&claims),
            Err(AuthError::AccountNotFound)
        ));
    }

    #[test]
    fn reissue_accepts_expired_access_token_and_rotates() {
        let (db, _dir) = test_db();
        let codec = test_codec();
        let account = seed_account(&db);
        let sessions = SessionManager::new(&codec, &db);

        // Login at t=0; access TTL is 3 600 000 ms.
        let p1 = sessions.create_session(&account, t0()).unwrap();

        // 100 seconds past access expiry, the refresh token is still live.
        let later = t0() + Duration::milliseconds(3_700_000);
        assert!(codec.decode_valid(&p1.access_token, later).is_err());

        let p2 = sessions
            .reissue(&p1.access_token, &p1.refresh_token, later)
            .unwrap();
        assert_ne!(p2.refresh_token, p1.refresh_token);

        // The pre-rotation refresh token is dead regardless of its expiry.
        assert!(matches!(
            sessions.reissue(&p1.access_token, &p1.refresh_token, later),
            Err(AuthError::RefreshMismatch)
        ));

        // The new pair keeps working.
        let p3 = sessions
            .reissue(&p2.access_token, &p2.refresh_token, later)
            .unwrap();
        assert_ne!(p3.refresh_token, p2.refresh_token);
    }

    #[test]
    fn reissue_rejects_expired_refresh_token() {
        let (db, _dir) = test_db();
        let codec = test_codec();
        let account = seed_account(&db);
        let sessions = SessionManager::new(&codec, &db);

        let p1 = sessions.create_session(&account, t0()).unwrap();
        let past_refresh_expiry = t0() + Duration::days(15);

        assert!(matches!(
            sessions.reissue(&p1.access_token, &p1.refresh_token, past_refresh_expiry),
            Err(AuthError::RefreshExpiredOrForged)
        ));
    }

    #[test]
    fn reissue_rejects_forged_refresh_token() {
        let (db, _dir) = test_db();
        let codec = test_codec();
        let account = seed_account(&db);
        let sessions = SessionManager::new(&codec, &db);

        let p1 = sessions.create_session(&account, t0()).unwrap();

        let foreign = TokenCodec::new(&TokenConfig {
            secret: "attacker-secret".to_string(),
            access_token_ttl_ms: 3_600_000,
            refresh_token_ttl_ms: 14 * 24 * 3_600_000,
        });
        let forged_refresh = foreign.issue(TokenKind::Refresh, "1", None, t0()).unwrap();

        assert!(matches!(
            sessions.reissue(&p1.access_token, &forged_refresh, t0()),
            Err(AuthError::RefreshExpiredOrForged)
        ));
    }

    #[test]
    fn reissue_without_stored_record_reports_mismatch() {
        let (db, _dir) = test_db();
        let codec = test_codec();
        let account = seed_account(&db);
        let sessions = SessionManager::new(&codec, &db);

        // Tokens minted directly, bypassing login, so no record exists.
        let subject = account.id.to_string();
        let access = codec
            .issue(TokenKind::Access, &subject, Some(&account.roles), t0())
            .unwrap();
        let refresh = codec.issue(TokenKind::Refresh, &subject, None, t0()).unwrap();

        assert!(matches!(
            sessions.reissue(&access, &refresh, t0()),
            Err(AuthError::RefreshMismatch)
        ));
    }

    #[test]
    fn second_login_invalidates_first_refresh_token() {
        let (db, _dir) = test_db();
        let codec = test_codec();
        let account = seed_account(&db);
        let sessions = SessionManager::new(&codec, &db);

        let first = sessions.create_session(&account, t0()).unwrap();
        let second = sessions
            .create_session(&account, t0() + Duration::seconds(30))
            .unwrap();

        let later = t0() + Duration::hours(2);
        assert!(matches!(
            sessions.reissue(&first.access_token, &first.refresh_token, later),
            Err(AuthError::RefreshMismatch)
        ));
        assert!(sessions
            .reissue(&second.access_token, &second.refresh_token, later)
            .is_ok());
    }

    #[test]
    fn second_login_leaves_first_access_token_valid() {
        // Intended behavior: a new login rotates only the refresh token.
        // Access tokens are short-lived bearer capabilities and stay valid
        // until their own expiry.
        let (db, _dir) = test_db();
        let codec = test_codec();
        let account = seed_account(&db);
        let sessions = SessionManager::new(&codec, &db);

        let first = sessions.create_session(&account, t0()).unwrap();
        sessions
            .create_session(&account, t0() + Duration::seconds(30))
            .unwrap();

        let still_live = t0() + Duration::minutes(10);
        let claims = codec.decode_valid(&first.access_token, still_live).unwrap();
        assert!(sessions.resolve(&claims).is_ok());
    }
}
