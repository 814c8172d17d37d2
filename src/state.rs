// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenCodec;
use crate::storage::Database;

/// Shared application state.
///
/// The database is internally synchronized (redb single-writer
/// transactions) and the codec is immutable, so both are shared as plain
/// `Arc`s with no lock.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub tokens: Arc<TokenCodec>,
}

impl AppState {
    pub fn new(db: Database, tokens: TokenCodec) -> Self {
        Self {
            db: Arc::new(db),
            tokens: Arc::new(tokens),
        }
    }
}
