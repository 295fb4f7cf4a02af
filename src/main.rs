// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fittrack API Server
//!
//! Serves the activity leaderboard on top of the Supabase tables written by
//! the web client.

use fittrack::{
    config::{Config, StoreBackend},
    db::{ActivityStore, InMemoryStore, SupabaseStore},
    services::LeaderboardEngine,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Fittrack API");

    // Build the data store
    let store: Arc<dyn ActivityStore> = match config.store_backend {
        StoreBackend::Supabase => Arc::new(SupabaseStore::new(
            &config.supabase_url,
            &config.supabase_anon_key,
        )),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; leaderboard will be empty");
            Arc::new(InMemoryStore::new())
        }
    };

    let leaderboard = LeaderboardEngine::new(store, config.leaderboard.clone());
    tracing::info!(
        candidate_limit = config.leaderboard.candidate_limit,
        top_n = config.leaderboard.top_n,
        query_timeout_ms = config.leaderboard.query_timeout.as_millis() as u64,
        max_concurrency = config.leaderboard.max_concurrency,
        "Leaderboard engine initialized"
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        leaderboard,
    });

    // Build router
    let app = fittrack::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fittrack=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
