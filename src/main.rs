// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::env;
use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use mealmeet_server::api::router;
use mealmeet_server::auth::{TokenCodec, TokenConfig};
use mealmeet_server::config::{AppConfig, LOG_FORMAT_ENV};
use mealmeet_server::state::AppState;
use mealmeet_server::storage::Database;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AppConfig::from_env();

    let db = Database::open(&config.data_dir.join("mealmeet.redb"))
        .expect("Failed to open database");

    let tokens = TokenCodec::new(&TokenConfig {
        secret: config.jwt_secret.clone(),
        access_token_ttl_ms: config.access_token_ttl_ms,
        refresh_token_ttl_ms: config.refresh_token_ttl_ms,
    });

    let state = AppState::new(db, tokens);
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Failed to parse bind address");

    tracing::info!("Mealmeet server listening on http://{addr} (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    if env::var(LOG_FORMAT_ENV).as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
    tracing::info!("Shutdown signal received");
}
