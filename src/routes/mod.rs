// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Router assembly: public health probe plus the authenticated leaderboard API.

pub mod api;

use crate::middleware::auth::require_auth;
use crate::AppState;
use axum::extract::State;
use axum::http::{header, request::Parts, HeaderValue, Method};
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Liveness payload for load balancers and uptime checks.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Which activity store the leaderboard reads from
    pub store: String,
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: state.config.store_backend.as_str().to_string(),
    })
}

/// The web app reads the leaderboard cross-origin with the Supabase cookie,
/// so credentials are allowed for the configured frontend and local dev hosts.
fn leaderboard_cors(frontend_url: String) -> CorsLayer {
    let allowed = move |origin: &HeaderValue, _: &Parts| {
        let origin = origin.to_str().unwrap_or("");
        origin == frontend_url
            || origin.starts_with("http://localhost")
            || origin.starts_with("http://127.0.0.1")
    };

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(allowed))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
}

/// Build the service router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let leaderboard_api =
        api::routes().route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(health_check))
        .merge(leaderboard_api)
        .layer(leaderboard_cors(state.config.frontend_url.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
