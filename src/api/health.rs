// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Simple health check response for liveness probes.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Readiness response with individual component status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Overall status ("ok" or "degraded").
    pub status: String,
    /// Embedded database status.
    pub database: String,
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Readiness probe: checks that the database answers reads.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Ready", body = ReadyResponse),
        (status = 503, description = "Degraded", body = ReadyResponse),
    )
)]
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let database_ok = state.db.is_readable();
    let (status, overall) = if database_ok {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(ReadyResponse {
            status: overall.to_string(),
            database: if database_ok { "ok" } else { "unreachable" }.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{TokenCodec, TokenConfig};
    use crate::storage::Database;
    use tempfile::TempDir;

    #[tokio::test]
    async fn health_reports_ok() {
        let Json(response) = health().await;
        assert_eq!(response.status, "ok");
    }

    #[tokio::test]
    async fn ready_reports_database_status() {
        let dir = TempDir::new().unwrap();
        let db = Database::open(&dir.path().join("test.redb")).unwrap();
        let codec = TokenCodec::new(&TokenConfig {
            secret: "test-signing-secret".to_string(),
            access_token_ttl_ms: 3_600_000,
            refresh_token_ttl_ms: 14 * 24 * 3_600_000,
        });
        let state = AppState::new(db, codec);

        let (status, Json(response)) = ready(State(state)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response.database, "ok");
    }
}
