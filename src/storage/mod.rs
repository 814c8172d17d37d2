// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistence for accounts, meal posts, and refresh-token records, backed
//! by a single embedded redb database (pure Rust, ACID).
//!
//! ## Layout
//!
//! - `database` - table definitions, error type, and the shared handle
//! - `repository` - typed repositories over the tables
//!
//! Values are stored as JSON bytes; keys are sequence-allocated integer
//! ids. Every multi-step mutation (unique-email insert, refresh-token
//! rotation) happens inside one write transaction, which is what the
//! session subsystem relies on for its replay guarantees.

pub mod database;
pub mod repository;

pub use database::{Database, DbError, DbResult};
pub use repository::{
    AccountRepository, NewAccount, NewPost, PostRepository, RefreshTokenRepository, StoredAccount,
    StoredPost,
};
