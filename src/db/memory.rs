// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Process-local `ActivityStore` for tests and local development.

use crate::db::{tables, ActivityStore};
use crate::error::AppError;
use crate::models::{
    Profile, StepRecord, StepTotals, WaterRecord, WaterTotals, WorkoutRecord, WorkoutTotals,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    profiles: Vec<Profile>,
    workouts: Vec<WorkoutRecord>,
    steps: Vec<StepRecord>,
    water: Vec<WaterRecord>,
}

/// In-memory store with failure and latency injection.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    failing: RwLock<HashSet<&'static str>>,
    slow: RwLock<Option<(&'static str, Duration)>>,
    queries: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_profile(&self, profile: Profile) {
        self.tables.write().await.profiles.push(profile);
    }

    pub async fn add_workout(&self, user_id: &str, date: NaiveDate, calories_burned: i64) {
        self.tables.write().await.workouts.push(WorkoutRecord {
            user_id: user_id.to_string(),
            date,
            calories_burned,
        });
    }

    pub async fn add_steps(&self, user_id: &str, date: NaiveDate, steps_count: i64) {
        self.tables.write().await.steps.push(StepRecord {
            user_id: user_id.to_string(),
            date,
            steps_count,
        });
    }

    pub async fn add_water(&self, user_id: &str, date: NaiveDate, amount_ml: i64) {
        self.tables.write().await.water.push(WaterRecord {
            user_id: user_id.to_string(),
            date,
            amount_ml,
        });
    }

    /// Make every query against `table` fail.
    pub async fn fail_table(&self, table: &'static str) {
        self.failing.write().await.insert(table);
    }

    /// Delay every query against `table` by `delay`.
    pub async fn slow_table(&self, table: &'static str, delay: Duration) {
        *self.slow.write().await = Some((table, delay));
    }

    /// Number of queries started so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Common prelude of every query: count, delay, then fail if injected.
    async fn enter(&self, table: &'static str) -> Result<(), AppError> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        let delay = match *self.slow.read().await {
            Some((slow, delay)) if slow == table => Some(delay),
            _ => None,
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.read().await.contains(table) {
            return Err(AppError::Store(format!("{} query failed (injected)", table)));
        }
        Ok(())
    }
}

#[async_trait]
impl ActivityStore for InMemoryStore {
    async fn list_profiles_by_points_desc(&self, limit: u32) -> Result<Vec<Profile>, AppError> {
        self.enter(tables::PROFILES).await?;

        let mut profiles = self.tables.read().await.profiles.clone();
        // Stable: equal totals keep insertion order
        profiles.sort_by(|a, b| b.total_points.cmp(&a.total_points));
        profiles.truncate(limit as usize);
        Ok(profiles)
    }

    async fn sum_workouts(
        &self,
        user_id: &str,
        since: NaiveDate,
    ) -> Result<WorkoutTotals, AppError> {
        self.enter(tables::WORKOUTS).await?;

        Ok(self
            .tables
            .read()
            .await
            .workouts
            .iter()
            .filter(|w| w.user_id == user_id && w.date >= since)
            .cloned()
            .collect())
    }

    async fn sum_steps(&self, user_id: &str, since: NaiveDate) -> Result<StepTotals, AppError> {
        self.enter(tables::STEPS).await?;

        let steps_sum = self
            .tables
            .read()
            .await
            .steps
            .iter()
            .filter(|s| s.user_id == user_id && s.date >= since)
            .map(|s| s.steps_count)
            .sum();
        Ok(StepTotals { steps_sum })
    }

    async fn sum_water(&self, user_id: &str, since: NaiveDate) -> Result<WaterTotals, AppError> {
        self.enter(tables::WATER_INTAKE).await?;

        let amount_sum = self
            .tables
            .read()
            .await
            .water
            .iter()
            .filter(|w| w.user_id == user_id && w.date >= since)
            .map(|w| w.amount_ml)
            .sum();
        Ok(WaterTotals { amount_sum })
    }
}
