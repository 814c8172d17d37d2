// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures for the REST API. All types derive
//! `Serialize`/`Deserialize` and `ToSchema` for JSON handling and OpenAPI
//! documentation.
//!
//! ## Model Categories
//!
//! - **Sign**: signup, login, and token reissue payloads
//! - **Accounts**: public account views and profile updates
//! - **Posts**: meal-recruitment posts with a restaurant coordinate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::Role;
use crate::storage::{StoredAccount, StoredPost};

// =============================================================================
// Geographic Point
// =============================================================================

/// A WGS84 coordinate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Point {
    /// Latitude in degrees, -90..=90
    pub latitude: f64,
    /// Longitude in degrees, -180..=180
    pub longitude: f64,
}

// =============================================================================
// Food Category
// =============================================================================

/// Food category of a meal post.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum FoodCategory {
    Korean,
    Chinese,
    Japanese,
    Western,
    Snack,
    Dessert,
}

// =============================================================================
// Sign Models
// =============================================================================

/// Request to create an account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignupRequest {
    /// Login email, unique across accounts
    pub email: String,
    /// Plaintext password; hashed before storage, never persisted as-is
    pub password: String,
    /// Legal/display name
    pub name: String,
    /// Nickname shown on posts
    pub nickname: String,
}

/// Response for a successful signup.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignupResponse {
    /// Id of the created account
    pub account_id: u64,
}

/// Request to log in.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request to reissue a token pair after access-token expiry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReissueRequest {
    /// The expired (but well-signed) access token
    pub access_token: String,
    /// The still-valid refresh token from the same session
    pub refresh_token: String,
}

// =============================================================================
// Account Models
// =============================================================================

/// Public view of an account. Never includes credentials.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct AccountResponse {
    pub account_id: u64,
    pub email: String,
    pub name: String,
    pub nickname: String,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
}

impl From<StoredAccount> for AccountResponse {
    fn from(account: StoredAccount) -> Self {
        Self {
            account_id: account.id,
            email: account.email,
            name: account.name,
            nickname: account.nickname,
            roles: account.roles,
            created_at: account.created_at,
        }
    }
}

/// Request to change the caller's nickname.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateNicknameRequest {
    pub nickname: String,
}

// =============================================================================
// Post Models
// =============================================================================

/// Public view of a meal post.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PostResponse {
    pub post_id: u64,
    pub creator_name: String,
    pub title: String,
    pub order_at: DateTime<Utc>,
    pub recruitment: u32,
    pub food_category: FoodCategory,
    pub restaurant: String,
    pub location: Point,
}

impl From<StoredPost> for PostResponse {
    fn from(post: StoredPost) -> Self {
        Self {
            post_id: post.id,
            creator_name: post.creator_name,
            title: post.title,
            order_at: post.order_at,
            recruitment: post.recruitment,
            food_category: post.food_category,
            restaurant: post.restaurant,
            location: post.location,
        }
    }
}

/// Request to create a meal post.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePostRequest {
    /// Post title
    pub title: String,
    /// Planned order time; must be in the future
    pub order_at: DateTime<Utc>,
    /// Number of people to recruit, at least 2
    pub recruitment: u32,
    /// Food category
    pub food_category: FoodCategory,
    /// Restaurant name
    pub restaurant: String,
    /// Restaurant coordinate
    pub location: Point,
}

/// Request to update a meal post. Only the creator (or an admin) may
/// update a post.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdatePostRequest {
    pub title: String,
    pub order_at: DateTime<Utc>,
    pub recruitment: u32,
    pub food_category: FoodCategory,
    pub restaurant: String,
    pub location: Point,
}

/// Pagination query parameters.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PageQuery {
    /// Zero-based page index
    #[serde(default)]
    pub page: usize,
    /// Page size
    #[serde(default = "default_page_size")]
    pub size: usize,
}

/// Pagination plus a title keyword.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Zero-based page index
    #[serde(default)]
    pub page: usize,
    /// Page size
    #[serde(default = "default_page_size")]
    pub size: usize,
    /// Substring to match against post titles; empty matches everything
    #[serde(default)]
    pub keyword: String,
}

fn default_page_size() -> usize {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn food_category_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&FoodCategory::Korean).unwrap(),
            r#""KOREAN""#
        );
    }

    #[test]
    fn page_query_defaults() {
        let query: PageQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page, 0);
        assert_eq!(query.size, 10);
    }

    #[test]
    fn account_response_drops_password_hash() {
        let account = StoredAccount {
            id: 3,
            email: "june@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            name: "June Kim".to_string(),
            nickname: "june".to_string(),
            roles: vec![Role::User],
            created_at: Utc::now(),
        };

        let response: AccountResponse = account.into();
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["account_id"], 3);
    }
}
