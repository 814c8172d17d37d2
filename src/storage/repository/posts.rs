// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Meal-post repository.
//!
//! Posts are soft-deleted: deletion flips `active` and listings filter on
//! it, so a deleted post stays on disk but disappears from every query.

use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};

use super::super::database::{Database, DbError, DbResult, POSTS, POST_SEQUENCE};
use crate::models::{FoodCategory, Point};

/// A stored meal-recruitment post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredPost {
    /// Sequence-allocated post id
    pub id: u64,
    /// Account id of the creator
    pub creator_id: u64,
    /// Creator display name, denormalized at creation time
    pub creator_name: String,
    /// Post title
    pub title: String,
    /// Planned order time
    pub order_at: DateTime<Utc>,
    /// Number of people to recruit (including the creator)
    pub recruitment: u32,
    /// Food category
    pub food_category: FoodCategory,
    /// Restaurant name
    pub restaurant: String,
    /// Restaurant coordinate
    pub location: Point,
    /// Soft-delete flag
    pub active: bool,
    /// When the post was created
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub creator_id: u64,
    pub creator_name: String,
    pub title: String,
    pub order_at: DateTime<Utc>,
    pub recruitment: u32,
    pub food_category: FoodCategory,
    pub restaurant: String,
    pub location: Point,
}

/// Repository for post operations.
pub struct PostRepository<'a> {
    db: &'a Database,
}

impl<'a> PostRepository<'a> {
    /// Create a new PostRepository.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create a post.
    pub fn create(&self, new: NewPost) -> DbResult<StoredPost> {
        let post = StoredPost {
            id: self.db.next_id(POST_SEQUENCE)?,
            creator_id: new.creator_id,
            creator_name: new.creator_name,
            title: new.title,
            order_at: new.order_at,
            recruitment: new.recruitment,
            food_category: new.food_category,
            restaurant: new.restaurant,
            location: new.location,
            active: true,
            created_at: Utc::now(),
        };
        self.write(&post)?;
        Ok(post)
    }

    /// Look up a post by id. Soft-deleted posts are reported as missing.
    pub fn find_by_id(&self, post_id: u64) -> DbResult<Option<StoredPost>> {
        let read_txn = self.db.raw().begin_read()?;
        let table = read_txn.open_table(POSTS)?;
        match table.get(post_id)? {
            Some(value) => {
                let post: StoredPost = serde_json::from_slice(value.value())?;
                Ok(post.active.then_some(post))
            }
            None => Ok(None),
        }
    }

    /// Overwrite an existing post.
    pub fn update(&self, post: &StoredPost) -> DbResult<()> {
        if self.find_by_id(post.id)?.is_none() {
            return Err(DbError::NotFound(format!("post {}", post.id)));
        }
        self.write(post)
    }

    /// Soft-delete a post.
    pub fn delete(&self, post_id: u64) -> DbResult<()> {
        let mut post = self
            .find_by_id(post_id)?
            .ok_or_else(|| DbError::NotFound(format!("post {post_id}")))?;
        post.active = false;
        self.write(&post)
    }

    /// Page through active posts, newest first.
    pub fn list(&self, page: usize, size: usize) -> DbResult<Vec<StoredPost>> {
        let posts = self.scan_active(|_| true)?;
        Ok(posts.into_iter().skip(page * size).take(size).collect())
    }

    /// Page through active posts whose title contains `keyword`, newest
    /// first. An empty keyword matches everything.
    pub fn search(&self, page: usize, size: usize, keyword: &str) -> DbResult<Vec<StoredPost>> {
        let posts = self.scan_active(|post| post.title.contains(keyword))?;
        Ok(posts.into_iter().skip(page * size).take(size).collect())
    }

    fn write(&self, post: &StoredPost) -> DbResult<()> {
        let bytes = serde_json::to_vec(post)?;
        let write_txn = self.db.raw().begin_write()?;
        {
            let mut table = write_txn.open_table(POSTS)?;
            table.insert(post.id, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn scan_active(&self, keep: impl Fn(&StoredPost) -> bool) -> DbResult<Vec<StoredPost>> {
        let read_txn = self.db.raw().begin_read()?;
        let table = read_txn.open_table(POSTS)?;

        let mut posts: Vec<StoredPost> = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let post: StoredPost = serde_json::from_slice(value.value())?;
            if post.active && keep(&post) {
                posts.push(post);
            }
        }
        // Newest first; ids are allocated in creation order.
        posts.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(posts)
    }
}
