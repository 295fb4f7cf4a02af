// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use fittrack::config::Config;
use fittrack::db::{ActivityStore, InMemoryStore, SupabaseStore};
use fittrack::middleware::auth::create_jwt;
use fittrack::routes::create_router;
use fittrack::services::LeaderboardEngine;
use fittrack::AppState;
use std::sync::Arc;

/// Build a router and state over the given store.
#[allow(dead_code)]
pub fn create_test_app_with_store(store: Arc<dyn ActivityStore>) -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let leaderboard = LeaderboardEngine::new(store, config.leaderboard.clone());

    let state = Arc::new(AppState {
        config,
        leaderboard,
    });

    (create_router(state.clone()), state)
}

/// Create a test app backed by an in-memory store.
/// Returns the router, the shared state and the store for seeding.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let (app, state) = create_test_app_with_store(store.clone());
    (app, state, store)
}

/// Create a test app whose store is offline (every query fails).
#[allow(dead_code)]
pub fn create_offline_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_store(Arc::new(SupabaseStore::new_mock()))
}

/// Create a Supabase-style access token for `user_id`.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, secret: &[u8]) -> String {
    create_jwt(user_id, secret).expect("Failed to create JWT")
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}
