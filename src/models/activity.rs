// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity records and the per-query totals derived from them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Row of the `workouts` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub user_id: String,
    pub date: NaiveDate,
    pub calories_burned: i64,
}

/// Row of the `steps` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub user_id: String,
    pub date: NaiveDate,
    pub steps_count: i64,
}

/// Row of the `water_intake` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterRecord {
    pub user_id: String,
    pub date: NaiveDate,
    pub amount_ml: i64,
}

/// Result of `sum_workouts`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkoutTotals {
    pub count: u32,
    pub calories_sum: i64,
}

/// Result of `sum_steps`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepTotals {
    pub steps_sum: i64,
}

/// Result of `sum_water`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaterTotals {
    pub amount_sum: i64,
}

impl FromIterator<WorkoutRecord> for WorkoutTotals {
    fn from_iter<I: IntoIterator<Item = WorkoutRecord>>(iter: I) -> Self {
        iter.into_iter().fold(Self::default(), |acc, w| Self {
            count: acc.count + 1,
            calories_sum: acc.calories_sum + w.calories_burned,
        })
    }
}

/// Summed activity metrics of one profile within a timeframe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityAggregate {
    pub workouts: u32,
    pub calories: i64,
    pub steps: i64,
    pub water_ml: i64,
}

impl ActivityAggregate {
    pub fn from_totals(workouts: WorkoutTotals, steps: StepTotals, water: WaterTotals) -> Self {
        Self {
            workouts: workouts.count,
            calories: workouts.calories_sum,
            steps: steps.steps_sum,
            water_ml: water.amount_sum,
        }
    }
}
