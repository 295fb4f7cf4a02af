// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard scoring model.
//!
//! Entries are derived on every request and never stored.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{ActivityAggregate, Profile};
use crate::time_utils::{month_start, week_start_sunday};

/// Points per logged workout.
pub const POINTS_PER_WORKOUT: f64 = 10.0;
/// Points per burned calorie.
pub const POINTS_PER_CALORIE: f64 = 0.1;
/// Points per step.
pub const POINTS_PER_STEP: f64 = 0.01;
/// Points per ml of water.
pub const POINTS_PER_WATER_ML: f64 = 0.05;

/// Lower bound used for the "all time" window. No records predate it.
pub fn all_time_floor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Window over which activity is aggregated for scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Timeframe {
    #[default]
    Week,
    Month,
    All,
}

impl Timeframe {
    /// Inclusive start date of the window containing `now`.
    ///
    /// Weeks start on Sunday. There is no end bound.
    pub fn start_date(self, now: DateTime<Utc>) -> NaiveDate {
        let today = now.date_naive();
        match self {
            Timeframe::Week => week_start_sunday(today),
            Timeframe::Month => month_start(today),
            Timeframe::All => all_time_floor(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::Week => "week",
            Timeframe::Month => "month",
            Timeframe::All => "all",
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite score of an aggregate, rounded to the nearest integer.
pub fn compute_points(aggregate: &ActivityAggregate) -> i64 {
    let raw = f64::from(aggregate.workouts) * POINTS_PER_WORKOUT
        + aggregate.calories as f64 * POINTS_PER_CALORIE
        + aggregate.steps as f64 * POINTS_PER_STEP
        + aggregate.water_ml as f64 * POINTS_PER_WATER_ML;
    raw.round() as i64
}

/// Percentage of `target` reached by `current`, clamped to `[0, 100]`.
///
/// A non-positive target yields 0.
pub fn progress_percent(current: i64, target: i64) -> f64 {
    if target <= 0 {
        return 0.0;
    }
    (current as f64 / target as f64 * 100.0).clamp(0.0, 100.0)
}

/// Scored leaderboard row for one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub full_name: String,
    pub total_workouts: u32,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_calories: i64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_steps: i64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_water_ml: i64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub points: i64,
}

impl LeaderboardEntry {
    pub fn from_aggregate(profile: &Profile, aggregate: ActivityAggregate) -> Self {
        Self {
            user_id: profile.id.clone(),
            full_name: profile.display_name().to_string(),
            total_workouts: aggregate.workouts,
            total_calories: aggregate.calories,
            total_steps: aggregate.steps,
            total_water_ml: aggregate.water_ml,
            points: compute_points(&aggregate),
        }
    }
}

/// Entry with its 1-based position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RankedEntry {
    pub rank: usize,
    #[serde(flatten)]
    pub entry: LeaderboardEntry,
}

/// Leaderboard for one timeframe as seen by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Leaderboard {
    pub timeframe: Timeframe,
    /// First day included (`YYYY-MM-DD`)
    pub start_date: NaiveDate,
    /// Rank-ordered, at most top-N
    pub entries: Vec<RankedEntry>,
    /// 1-based rank of the requesting user, 0 if not listed
    pub current_user_rank: usize,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub current_user_points: Option<i64>,
    /// Share of the leader's score reached by the requesting user
    pub current_user_progress: Option<f64>,
}

impl Leaderboard {
    /// Shape ranked entries into the response for `current_user_rank`.
    pub fn new(
        timeframe: Timeframe,
        start_date: NaiveDate,
        ranked: Vec<LeaderboardEntry>,
        current_user_rank: usize,
    ) -> Self {
        let leader_points = ranked.first().map(|e| e.points).unwrap_or(0);
        let current = current_user_rank
            .checked_sub(1)
            .and_then(|idx| ranked.get(idx))
            .map(|e| e.points);

        let entries = ranked
            .into_iter()
            .enumerate()
            .map(|(idx, entry)| RankedEntry {
                rank: idx + 1,
                entry,
            })
            .collect();

        Self {
            timeframe,
            start_date,
            entries,
            current_user_rank,
            current_user_points: current,
            current_user_progress: current.map(|points| progress_percent(points, leader_points)),
        }
    }
}

/// Scoring rules, as shown next to the leaderboard.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ScoringRules {
    pub points_per_workout: f64,
    pub points_per_calorie: f64,
    pub points_per_step: f64,
    pub points_per_water_ml: f64,
    /// Profiles considered (top by lifetime points)
    pub candidate_pool: u32,
    /// Entries returned
    pub top_n: usize,
}

impl ScoringRules {
    pub fn new(candidate_pool: u32, top_n: usize) -> Self {
        Self {
            points_per_workout: POINTS_PER_WORKOUT,
            points_per_calorie: POINTS_PER_CALORIE,
            points_per_step: POINTS_PER_STEP,
            points_per_water_ml: POINTS_PER_WATER_ML,
            candidate_pool,
            top_n,
        }
    }
}
