// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values, and the
//! immutable [`AppConfig`] loaded from the environment once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for the embedded database | `/data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_SECRET` | Token signing secret | Required |
//! | `ACCESS_TOKEN_TTL_MS` | Access-token lifetime | `3600000` (1 hour) |
//! | `REFRESH_TOKEN_TTL_MS` | Refresh-token lifetime | `1209600000` (14 days) |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//!
//! The TTLs are policy, not mechanism: changing them reconfigures the
//! token codec without touching its logic.

use std::env;
use std::path::PathBuf;

/// Environment variable name for the data directory path.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the server bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the server bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the token signing secret.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Environment variable name for the access-token TTL in milliseconds.
pub const ACCESS_TOKEN_TTL_MS_ENV: &str = "ACCESS_TOKEN_TTL_MS";

/// Environment variable name for the refresh-token TTL in milliseconds.
pub const REFRESH_TOKEN_TTL_MS_ENV: &str = "REFRESH_TOKEN_TTL_MS";

/// Environment variable name for the logging format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default access-token lifetime: 1 hour.
pub const DEFAULT_ACCESS_TOKEN_TTL_MS: i64 = 60 * 60 * 1000;

/// Default refresh-token lifetime: 14 days.
pub const DEFAULT_REFRESH_TOKEN_TTL_MS: i64 = 14 * 24 * 60 * 60 * 1000;

/// Immutable application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server bind address
    pub host: String,
    /// Server bind port
    pub port: u16,
    /// Root directory for the embedded database
    pub data_dir: PathBuf,
    /// Token signing secret
    pub jwt_secret: String,
    /// Access-token lifetime in milliseconds
    pub access_token_ttl_ms: i64,
    /// Refresh-token lifetime in milliseconds
    pub refresh_token_ttl_ms: i64,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// # Panics
    ///
    /// Panics when `JWT_SECRET` is unset. The service cannot sign or
    /// verify tokens without it, so startup must fail loudly.
    pub fn from_env() -> Self {
        Self {
            host: env::var(HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var(PORT_ENV)
                .ok()
                .and_then(|port| port.parse().ok())
                .unwrap_or(8080),
            data_dir: env::var(DATA_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/data")),
            jwt_secret: env::var(JWT_SECRET_ENV)
                .expect("JWT_SECRET must be set to sign session tokens"),
            access_token_ttl_ms: env_ttl(ACCESS_TOKEN_TTL_MS_ENV, DEFAULT_ACCESS_TOKEN_TTL_MS),
            refresh_token_ttl_ms: env_ttl(REFRESH_TOKEN_TTL_MS_ENV, DEFAULT_REFRESH_TOKEN_TTL_MS),
        }
    }
}

fn env_ttl(var: &str, default: i64) -> i64 {
    env::var(var)
        .ok()
        .and_then(|value| value.parse().ok())
        .filter(|ttl| *ttl > 0)
        .unwrap_or(default)
}
