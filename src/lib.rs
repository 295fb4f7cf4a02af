// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Fittrack: leaderboard service for the fitness tracker.
//!
//! This crate ranks users by a composite activity score (workouts, calories,
//! steps and water intake) over a week, month or all time. Data lives in
//! Supabase; this service only reads it.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::LeaderboardEngine;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub leaderboard: LeaderboardEngine,
}
