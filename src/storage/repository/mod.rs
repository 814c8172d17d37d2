// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repositories over the embedded database.

pub mod accounts;
pub mod posts;
pub mod refresh_tokens;

pub use accounts::{AccountRepository, NewAccount, StoredAccount};
pub use posts::{NewPost, PostRepository, StoredPost};
pub use refresh_tokens::RefreshTokenRepository;
