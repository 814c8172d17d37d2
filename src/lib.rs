// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Mealmeet Server - Meal Meetup Backend
//!
//! This crate provides a backend for user accounts, geotagged
//! meal-recruitment posts, and stateless token-based sessions with
//! refresh rotation.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token sessions: codec, request gate, reissue protocol
//! - `storage` - Embedded redb persistence

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
