// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard computation.
//!
//! Handles the core workflow:
//! 1. Resolve the timeframe to a start date
//! 2. Fetch the candidate pool (top profiles by lifetime points)
//! 3. Aggregate each candidate's activity since the start date, concurrently
//! 4. Score, rank and truncate
//! 5. Locate the requesting user

use crate::config::LeaderboardSettings;
use crate::db::{tables, ActivityStore};
use crate::error::{AppError, Result};
use crate::models::{ActivityAggregate, Leaderboard, LeaderboardEntry, Profile, Timeframe};
use crate::services::requests::{RequestGenerations, RequestTicket};
use chrono::{DateTime, NaiveDate, Utc};
use futures_util::{stream, FutureExt, StreamExt};
use std::future::Future;
use std::sync::Arc;

/// Computes ranked leaderboards from an injected store.
#[derive(Clone)]
pub struct LeaderboardEngine {
    store: Arc<dyn ActivityStore>,
    settings: LeaderboardSettings,
    requests: RequestGenerations,
}

impl LeaderboardEngine {
    pub fn new(store: Arc<dyn ActivityStore>, settings: LeaderboardSettings) -> Self {
        Self {
            store,
            settings,
            requests: RequestGenerations::new(),
        }
    }

    pub fn settings(&self) -> &LeaderboardSettings {
        &self.settings
    }

    /// Per-user request tracking used by `get_leaderboard_for`.
    pub fn requests(&self) -> &RequestGenerations {
        &self.requests
    }

    /// Inclusive start date for `timeframe` as of `now`.
    pub fn resolve_timeframe_start(timeframe: Timeframe, now: DateTime<Utc>) -> NaiveDate {
        timeframe.start_date(now)
    }

    /// Up to `limit` profiles by lifetime points.
    ///
    /// An empty pool is a valid result; a failed query is fatal.
    pub async fn fetch_candidate_profiles(&self, limit: u32) -> Result<Vec<Profile>> {
        self.bounded(self.store.list_profiles_by_points_desc(limit))
            .await
            .map_err(|e| AppError::RosterFetch(e.to_string()))
    }

    /// Sum one profile's activity since `start` and score it.
    ///
    /// Failed or timed-out sub-queries count as zero.
    pub async fn aggregate_profile(&self, profile: &Profile, start: NaiveDate) -> LeaderboardEntry {
        let (workouts, steps, water) = tokio::join!(
            self.bounded(self.store.sum_workouts(&profile.id, start)),
            self.bounded(self.store.sum_steps(&profile.id, start)),
            self.bounded(self.store.sum_water(&profile.id, start)),
        );

        let aggregate = ActivityAggregate::from_totals(
            or_zero(&profile.id, tables::WORKOUTS, workouts),
            or_zero(&profile.id, tables::STEPS, steps),
            or_zero(&profile.id, tables::WATER_INTAKE, water),
        );

        LeaderboardEntry::from_aggregate(profile, aggregate)
    }

    /// Aggregate all candidates and return the top entries by points.
    ///
    /// Ties keep candidate order.
    pub async fn build_leaderboard(
        &self,
        candidates: &[Profile],
        start: NaiveDate,
    ) -> Vec<LeaderboardEntry> {
        let lookups: Vec<_> = candidates
            .iter()
            .map(|profile| self.aggregate_profile(profile, start).boxed())
            .collect();

        // `buffered` yields in input order, which the stable sort relies on
        let entries: Vec<LeaderboardEntry> = stream::iter(lookups)
            .buffered(self.settings.max_concurrency.max(1))
            .collect()
            .await;

        rank_entries(entries, self.settings.top_n)
    }

    /// 1-based rank of `current_user_id` in `ranked`, or 0 if absent.
    pub fn locate_current_user(ranked: &[LeaderboardEntry], current_user_id: &str) -> usize {
        ranked
            .iter()
            .position(|entry| entry.user_id == current_user_id)
            .map_or(0, |idx| idx + 1)
    }

    /// Leaderboard for `timeframe` as seen by `current_user_id`, as of now.
    pub async fn get_leaderboard(
        &self,
        timeframe: Timeframe,
        current_user_id: &str,
    ) -> Result<Leaderboard> {
        self.get_leaderboard_at(timeframe, current_user_id, Utc::now())
            .await
    }

    /// Same as `get_leaderboard` with an explicit clock.
    pub async fn get_leaderboard_at(
        &self,
        timeframe: Timeframe,
        current_user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Leaderboard> {
        let start = Self::resolve_timeframe_start(timeframe, now);

        let candidates = self
            .fetch_candidate_profiles(self.settings.candidate_limit)
            .await?;
        tracing::debug!(
            timeframe = %timeframe,
            start = %start,
            candidates = candidates.len(),
            "Fetched leaderboard candidates"
        );

        let ranked = self.build_leaderboard(&candidates, start).await;
        let current_user_rank = Self::locate_current_user(&ranked, current_user_id);

        tracing::info!(
            timeframe = %timeframe,
            entries = ranked.len(),
            current_user_rank,
            "Leaderboard computed"
        );

        Ok(Leaderboard::new(timeframe, start, ranked, current_user_rank))
    }

    /// Compute the leaderboard for `ticket`, abandoning the work as soon as a
    /// newer request from the same user starts.
    pub async fn get_leaderboard_for(
        &self,
        ticket: &mut RequestTicket,
        timeframe: Timeframe,
    ) -> Result<Leaderboard> {
        let user_id = ticket.user_id().to_string();

        let result = if ticket.is_current() {
            tokio::select! {
                biased;
                _ = ticket.superseded() => Err(AppError::Superseded),
                result = self.get_leaderboard(timeframe, &user_id) => result,
            }
        } else {
            Err(AppError::Superseded)
        };

        self.requests.finish(ticket);

        match result {
            Ok(_) if !ticket.is_current() => Err(AppError::Superseded),
            Err(AppError::Superseded) => {
                tracing::debug!(
                    user_id = %user_id,
                    generation = ticket.generation(),
                    "Leaderboard request superseded"
                );
                Err(AppError::Superseded)
            }
            other => other,
        }
    }

    /// Apply the per-query timeout to a store call.
    async fn bounded<T, F>(&self, query: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let timeout = self.settings.query_timeout;
        tokio::time::timeout(timeout, query)
            .await
            .unwrap_or_else(|_| {
                Err(AppError::Store(format!(
                    "query timed out after {} ms",
                    timeout.as_millis()
                )))
            })
    }
}

/// Sort by points descending (stable) and keep the first `top_n`.
pub fn rank_entries(mut entries: Vec<LeaderboardEntry>, top_n: usize) -> Vec<LeaderboardEntry> {
    entries.sort_by(|a, b| b.points.cmp(&a.points));
    entries.truncate(top_n);
    entries
}

/// Unwrap a sub-query result, counting a failure as zero.
fn or_zero<T: Default>(user_id: &str, source: &str, result: Result<T>) -> T {
    result.unwrap_or_else(|err| {
        tracing::warn!(
            user_id,
            source,
            error = %err,
            "Aggregate query failed, counting as zero"
        );
        T::default()
    })
}
