// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `accounts`: account_id → serialized StoredAccount (JSON bytes)
//! - `accounts_by_email`: email → account_id (uniqueness index)
//! - `refresh_tokens`: account_id → current refresh token string
//! - `posts`: post_id → serialized StoredPost (JSON bytes)
//! - `sequences`: sequence name → last issued id
//!
//! The `refresh_tokens` table keys on the owning account, so the storage
//! layer itself guarantees at most one live refresh token per account.
//! Rotation happens inside a single write transaction (see
//! `RefreshTokenRepository::rotate`), which serializes concurrent reissue
//! attempts for the same account.

use std::path::Path;

use redb::{ReadableDatabase, ReadableTable, TableDefinition};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary account table: account_id → serialized StoredAccount.
pub(crate) const ACCOUNTS: TableDefinition<u64, &[u8]> = TableDefinition::new("accounts");

/// Uniqueness index: email → account_id.
pub(crate) const ACCOUNTS_BY_EMAIL: TableDefinition<&str, u64> =
    TableDefinition::new("accounts_by_email");

/// Single-session invariant lives here: account_id → refresh token string.
pub(crate) const REFRESH_TOKENS: TableDefinition<u64, &str> =
    TableDefinition::new("refresh_tokens");

/// Post table: post_id → serialized StoredPost.
pub(crate) const POSTS: TableDefinition<u64, &[u8]> = TableDefinition::new("posts");

/// Id sequences: sequence name → last issued id.
pub(crate) const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences");

/// Sequence names.
pub(crate) const ACCOUNT_SEQUENCE: &str = "accounts";
pub(crate) const POST_SEQUENCE: &str = "posts";

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("redb database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),
}

pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Database
// =============================================================================

/// Embedded ACID database shared by all repositories.
pub struct Database {
    inner: redb::Database,
}

impl Database {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> DbResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let inner = redb::Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = inner.begin_write()?;
        {
            let _ = write_txn.open_table(ACCOUNTS)?;
            let _ = write_txn.open_table(ACCOUNTS_BY_EMAIL)?;
            let _ = write_txn.open_table(REFRESH_TOKENS)?;
            let _ = write_txn.open_table(POSTS)?;
            let _ = write_txn.open_table(SEQUENCES)?;
        }
        write_txn.commit()?;

        Ok(Self { inner })
    }

    /// Raw handle for repository transactions.
    pub(crate) fn raw(&self) -> &redb::Database {
        &self.inner
    }

    /// Allocate the next id in a named sequence.
    pub(crate) fn next_id(&self, sequence: &str) -> DbResult<u64> {
        let write_txn = self.inner.begin_write()?;
        let id = {
            let mut table = write_txn.open_table(SEQUENCES)?;
            let next = table.get(sequence)?.map(|v| v.value()).unwrap_or(0) + 1;
            table.insert(sequence, next)?;
            next
        };
        write_txn.commit()?;
        Ok(id)
    }

    /// Whether the database file answers a read transaction. Used by the
    /// readiness probe.
    pub fn is_readable(&self) -> bool {
        self.inner.begin_read().is_ok()
    }
}
