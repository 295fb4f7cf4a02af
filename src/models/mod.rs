// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod leaderboard;
pub mod profile;

pub use activity::{
    ActivityAggregate, StepRecord, StepTotals, WaterRecord, WaterTotals, WorkoutRecord,
    WorkoutTotals,
};
pub use leaderboard::{Leaderboard, LeaderboardEntry, RankedEntry, ScoringRules, Timeframe};
pub use profile::Profile;
