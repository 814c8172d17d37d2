// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Refresh-token records: the durable half of the session subsystem.
//!
//! One record per account, keyed by account id. `put` creates the record on
//! login (and overwrites it on a later login); `rotate` replaces it during
//! reissue, but only when the stored value still matches the token the
//! client presented. Both the comparison and the overwrite happen inside a
//! single write transaction, so two concurrent reissue attempts for one
//! account cannot both succeed: the loser's compare sees the winner's new
//! token and fails.
//!
//! No expiry lives here. Staleness is carried by the token's own `exp`
//! claim, checked by the caller before the store is consulted.

use redb::{ReadableDatabase, ReadableTable};

use super::super::database::{Database, DbResult, REFRESH_TOKENS};

/// Repository for the account → refresh token mapping.
pub struct RefreshTokenRepository<'a> {
    db: &'a Database,
}

impl<'a> RefreshTokenRepository<'a> {
    /// Create a new RefreshTokenRepository.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Get the currently valid refresh token for an account, if any.
    pub fn get(&self, account_id: u64) -> DbResult<Option<String>> {
        let read_txn = self.db.raw().begin_read()?;
        let table = read_txn.open_table(REFRESH_TOKENS)?;
        Ok(table.get(account_id)?.map(|v| v.value().to_string()))
    }

    /// Upsert the record for an account, overwriting any prior token.
    ///
    /// This is the login path. The unique key keeps the invariant of at
    /// most one live refresh token per account.
    pub fn put(&self, account_id: u64, token: &str) -> DbResult<()> {
        let write_txn = self.db.raw().begin_write()?;
        {
            let mut table = write_txn.open_table(REFRESH_TOKENS)?;
            table.insert(account_id, token)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Atomically replace `current` with `next` for an account.
    ///
    /// Returns `false` without writing when no record exists or the stored
    /// value is not exactly `current`, including the case where a
    /// concurrent rotation already swapped it.
    pub fn rotate(&self, account_id: u64, current: &str, next: &str) -> DbResult<bool> {
        let write_txn = self.db.raw().begin_write()?;
        let matched = {
            let mut table = write_txn.open_table(REFRESH_TOKENS)?;
            let stored_matches = match table.get(account_id)? {
                Some(stored) => stored.value() == current,
                None => false,
            };
            if stored_matches {
                table.insert(account_id, next)?;
            }
            stored_matches
        };
        if matched {
            write_txn.commit()?;
        }
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_db() -> (Database, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let db = Database::open(&dir.path().join("test.redb")).expect("open db");
        (db, dir)
    }

    #[test]
    fn get_returns_none_for_unknown_account() {
        let (db, _dir) = test_db();
        let repo = RefreshTokenRepository::new(&db);
        assert_eq!(repo.get(1).unwrap(), None);
    }

    #[test]
    fn put_overwrites_prior_record() {
        let (db, _dir) = test_db();
        let repo = RefreshTokenRepository::new(&db);

        repo.put(1, "first-token").unwrap();
        assert_eq!(repo.get(1).unwrap().as_deref(), Some("first-token"));

        repo.put(1, "second-token").unwrap();
        assert_eq!(repo.get(1).unwrap().as_deref(), Some("second-token"));
    }

    #[test]
    fn rotate_swaps_on_exact_match() {
        let (db, _dir) = test_db();
        let repo = RefreshTokenRepository::new(&db);

        repo.put(1, "old").unwrap();
        assert!(repo.rotate(1, "old", "new").unwrap());
        assert_eq!(repo.get(1).unwrap().as_deref(), Some("new"));
    }

    #[test]
    fn rotate_refuses_mismatch_and_leaves_record_intact() {
        let (db, _dir) = test_db();
        let repo = RefreshTokenRepository::new(&db);

        repo.put(1, "current").unwrap();
        assert!(!repo.rotate(1, "stale", "new").unwrap());
        assert_eq!(repo.get(1).unwrap().as_deref(), Some("current"));
    }

    #[test]
    fn rotate_refuses_absent_record() {
        let (db, _dir) = test_db();
        let repo = RefreshTokenRepository::new(&db);
        assert!(!repo.rotate(1, "anything", "new").unwrap());
        assert_eq!(repo.get(1).unwrap(), None);
    }

    #[test]
    fn rotated_away_token_never_matches_again() {
        let (db, _dir) = test_db();
        let repo = RefreshTokenRepository::new(&db);

        repo.put(1, "first").unwrap();
        assert!(repo.rotate(1, "first", "second").unwrap());
        // Replaying the first token fails forever after.
        assert!(!repo.rotate(1, "first", "third").unwrap());
        assert_eq!(repo.get(1).unwrap().as_deref(), Some("second"));
    }
}
