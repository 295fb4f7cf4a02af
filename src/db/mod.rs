// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data access layer.
//!
//! The leaderboard only reads from the hosted store. `ActivityStore` is the
//! seam: `SupabaseStore` talks to PostgREST, `InMemoryStore` backs tests and
//! local development.

pub mod memory;
pub mod supabase;

pub use memory::InMemoryStore;
pub use supabase::SupabaseStore;

use crate::error::AppError;
use crate::models::{Profile, StepTotals, WaterTotals, WorkoutTotals};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Table names as constants.
pub mod tables {
    pub const PROFILES: &str = "profiles";
    pub const WORKOUTS: &str = "workouts";
    pub const STEPS: &str = "steps";
    pub const WATER_INTAKE: &str = "water_intake";
}

/// Read-only queries the leaderboard needs from the data service.
///
/// Every query distinguishes "no rows" (`Ok` with zero totals) from
/// "query failed" (`Err`).
#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// Up to `limit` profiles, ordered by `total_points` descending.
    async fn list_profiles_by_points_desc(&self, limit: u32) -> Result<Vec<Profile>, AppError>;

    /// Count and calorie sum of workouts dated on or after `since`.
    async fn sum_workouts(&self, user_id: &str, since: NaiveDate)
        -> Result<WorkoutTotals, AppError>;

    /// Step sum of step records dated on or after `since`.
    async fn sum_steps(&self, user_id: &str, since: NaiveDate) -> Result<StepTotals, AppError>;

    /// Water sum (ml) of intake records dated on or after `since`.
    async fn sum_water(&self, user_id: &str, since: NaiveDate) -> Result<WaterTotals, AppError>;
}
