// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account repository.
//!
//! Accounts are stored as JSON values keyed by a sequence-allocated id,
//! with a secondary `email → id` table enforcing email uniqueness inside
//! the same write transaction that inserts the record.

use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};

use super::super::database::{
    Database, DbError, DbResult, ACCOUNTS, ACCOUNTS_BY_EMAIL, ACCOUNT_SEQUENCE,
};
use crate::auth::Role;

/// A stored account record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredAccount {
    /// Sequence-allocated account id
    pub id: u64,
    /// Login email, unique across accounts
    pub email: String,
    /// Argon2id PHC hash; never serialized into API responses
    pub password_hash: String,
    /// Legal/display name
    pub name: String,
    /// Nickname shown on posts
    pub nickname: String,
    /// Granted roles
    pub roles: Vec<Role>,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Fields required to create an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub nickname: String,
}

/// Repository for account operations.
pub struct AccountRepository<'a> {
    db: &'a Database,
}

impl<'a> AccountRepository<'a> {
    /// Create a new AccountRepository.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create an account with the default `USER` role.
    ///
    /// Fails with [`DbError::AlreadyExists`] when the email is taken; the
    /// uniqueness check and both inserts share one write transaction.
    pub fn create(&self, new: NewAccount) -> DbResult<StoredAccount> {
        let account = StoredAccount {
            id: self.db.next_id(ACCOUNT_SEQUENCE)?,
            email: new.email,
            password_hash: new.password_hash,
            name: new.name,
            nickname: new.nickname,
            roles: vec![Role::User],
            created_at: Utc::now(),
        };
        let bytes = serde_json::to_vec(&account)?;

        let write_txn = self.db.raw().begin_write()?;
        let duplicate = {
            let mut by_email = write_txn.open_table(ACCOUNTS_BY_EMAIL)?;
            if by_email.get(account.email.as_str())?.is_some() {
                true
            } else {
                by_email.insert(account.email.as_str(), account.id)?;
                let mut accounts = write_txn.open_table(ACCOUNTS)?;
                accounts.insert(account.id, bytes.as_slice())?;
                false
            }
        };
        if duplicate {
            // Dropping the transaction aborts it.
            return Err(DbError::AlreadyExists(format!(
                "account email {}",
                account.email
            )));
        }
        write_txn.commit()?;
        Ok(account)
    }

    /// Look up an account by id.
    pub fn find_by_id(&self, account_id: u64) -> DbResult<Option<StoredAccount>> {
        let read_txn = self.db.raw().begin_read()?;
        let table = read_txn.open_table(ACCOUNTS)?;
        match table.get(account_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Look up an account by email.
    pub fn find_by_email(&self, email: &str) -> DbResult<Option<StoredAccount>> {
        let read_txn = self.db.raw().begin_read()?;
        let by_email = read_txn.open_table(ACCOUNTS_BY_EMAIL)?;
        let Some(id) = by_email.get(email)?.map(|v| v.value()) else {
            return Ok(None);
        };
        let accounts = read_txn.open_table(ACCOUNTS)?;
        match accounts.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// List all accounts, ordered by id.
    pub fn list_all(&self) -> DbResult<Vec<StoredAccount>> {
        let read_txn = self.db.raw().begin_read()?;
        let table = read_txn.open_table(ACCOUNTS)?;

        let mut accounts = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            accounts.push(serde_json::from_slice(value.value())?);
        }
        Ok(accounts)
    }

    /// Update an account's nickname, returning the updated record.
    pub fn update_nickname(&self, account_id: u64, nickname: &str) -> DbResult<StoredAccount> {
        let write_txn = self.db.raw().begin_write()?;
        let updated = {
            let mut table = write_txn.open_table(ACCOUNTS)?;
            let mut account: StoredAccount = match table.get(account_id)? {
                Some(value) => serde_json::from_slice(value.value())?,
                None => {
                    return Err(DbError::NotFound(format!("account {account_id}")));
                }
            };
            account.nickname = nickname.to_string();
            let bytes = serde_json::to_vec(&account)?;
            table.insert(account_id, bytes.as_slice())?;
            account
        };
        write_txn.commit()?;
        Ok(updated)
    }
}
