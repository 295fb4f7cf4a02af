// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Leaderboard, ScoringRules, Timeframe};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/leaderboard", get(get_leaderboard))
        .route("/api/leaderboard/scoring", get(get_scoring))
}

// ─── Leaderboard ─────────────────────────────────────────────

#[derive(Deserialize)]
struct LeaderboardQuery {
    /// "week" (default), "month" or "all"
    timeframe: Option<String>,
}

fn parse_timeframe(raw: Option<&str>) -> Result<Timeframe> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Timeframe::default()),
        Some("week") => Ok(Timeframe::Week),
        Some("month") => Ok(Timeframe::Month),
        Some("all") => Ok(Timeframe::All),
        Some(other) => Err(AppError::BadRequest(format!(
            "Invalid 'timeframe' parameter: {:?} (expected week, month or all)",
            other
        ))),
    }
}

/// Get the leaderboard for the requested timeframe.
///
/// A newer request from the same user cancels this one.
async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<LeaderboardQuery>,
) -> Result<Json<Leaderboard>> {
    let timeframe = parse_timeframe(params.timeframe.as_deref())?;

    tracing::debug!(
        user_id = %user.user_id,
        timeframe = %timeframe,
        "Fetching leaderboard"
    );

    let mut ticket = state.leaderboard.requests().begin(&user.user_id);
    let leaderboard = state
        .leaderboard
        .get_leaderboard_for(&mut ticket, timeframe)
        .await?;

    Ok(Json(leaderboard))
}

// ─── Scoring Rules ───────────────────────────────────────────

/// How points are calculated.
async fn get_scoring(State(state): State<Arc<AppState>>) -> Json<ScoringRules> {
    let settings = state.leaderboard.settings();
    Json(ScoringRules::new(settings.candidate_limit, settings.top_n))
}
