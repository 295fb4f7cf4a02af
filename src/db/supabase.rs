// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Supabase (PostgREST) client implementing `ActivityStore`.
//!
//! Sums are computed client side from the selected column, matching what
//! the web client does with the same anon key and row-level policies.

use crate::db::{tables, ActivityStore};
use crate::error::AppError;
use crate::models::{Profile, StepTotals, WaterTotals, WorkoutTotals};
use crate::time_utils::format_date;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Connection details for one Supabase project.
#[derive(Clone)]
struct SupabaseClient {
    http: reqwest::Client,
    rest_url: String,
    anon_key: String,
}

/// Supabase-backed store.
#[derive(Clone)]
pub struct SupabaseStore {
    client: Option<SupabaseClient>,
}

#[derive(Deserialize)]
struct CaloriesRow {
    calories_burned: Option<i64>,
}

#[derive(Deserialize)]
struct StepsRow {
    steps_count: Option<i64>,
}

#[derive(Deserialize)]
struct WaterRow {
    amount_ml: Option<i64>,
}

impl SupabaseStore {
    /// Create a client for the project at `url` (e.g. `https://xyz.supabase.co`).
    pub fn new(url: &str, anon_key: &str) -> Self {
        let rest_url = format!("{}/rest/v1", url.trim_end_matches('/'));
        tracing::info!(rest_url = %rest_url, "Supabase store configured");

        Self {
            client: Some(SupabaseClient {
                http: reqwest::Client::new(),
                rest_url,
                anon_key: anon_key.to_string(),
            }),
        }
    }

    /// Create an offline client for testing.
    ///
    /// All queries will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&SupabaseClient, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Store("Store not connected (offline mode)".to_string()))
    }

    /// Fetch rows of `table` matching the PostgREST `params`.
    async fn select_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, AppError> {
        let client = self.get_client()?;
        let url = format!("{}/{}", client.rest_url, table);

        let response = client
            .http
            .get(&url)
            .header("apikey", &client.anon_key)
            .bearer_auth(&client.anon_key)
            .query(params)
            .send()
            .await
            .map_err(|e| AppError::Store(format!("{} request failed: {}", table, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Store(format!(
                "{} query failed: HTTP {}: {}",
                table, status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Store(format!("{} response parse error: {}", table, e)))
    }

    /// Filter shared by the per-user activity queries.
    fn user_since(column: &str, user_id: &str, since: NaiveDate) -> Vec<(&'static str, String)> {
        vec![
            ("select", column.to_string()),
            ("user_id", format!("eq.{}", user_id)),
            ("date", format!("gte.{}", format_date(since))),
        ]
    }
}

#[async_trait]
impl ActivityStore for SupabaseStore {
    async fn list_profiles_by_points_desc(&self, limit: u32) -> Result<Vec<Profile>, AppError> {
        self.select_rows(
            tables::PROFILES,
            &[
                ("select", "id,full_name,total_points".to_string()),
                ("order", "total_points.desc".to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    async fn sum_workouts(
        &self,
        user_id: &str,
        since: NaiveDate,
    ) -> Result<WorkoutTotals, AppError> {
        let rows: Vec<CaloriesRow> = self
            .select_rows(
                tables::WORKOUTS,
                &Self::user_since("calories_burned", user_id, since),
            )
            .await?;
        Ok(WorkoutTotals {
            count: rows.len() as u32,
            calories_sum: rows.iter().filter_map(|r| r.calories_burned).sum(),
        })
    }

    async fn sum_steps(&self, user_id: &str, since: NaiveDate) -> Result<StepTotals, AppError> {
        let rows: Vec<StepsRow> = self
            .select_rows(tables::STEPS, &Self::user_since("steps_count", user_id, since))
            .await?;
        Ok(StepTotals {
            steps_sum: rows.iter().filter_map(|r| r.steps_count).sum(),
        })
    }

    async fn sum_water(&self, user_id: &str, since: NaiveDate) -> Result<WaterTotals, AppError> {
        let rows: Vec<WaterRow> = self
            .select_rows(
                tables::WATER_INTAKE,
                &Self::user_since("amount_ml", user_id, since),
            )
            .await?;
        Ok(WaterTotals {
            amount_sum: rows.iter().filter_map(|r| r.amount_ml).sum(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_offline_store_errors() {
        let store = SupabaseStore::new_mock();

        let err = store.list_profiles_by_points_desc(20).await.unwrap_err();
        assert!(matches!(err, AppError::Store(_)));

        let since = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(store.sum_steps("u1", since).await.is_err());
    }

    #[test]
    fn test_rest_url_strips_trailing_slash() {
        let store = SupabaseStore::new("https://example.supabase.co/", "key");
        let client = store.get_client().unwrap();
        assert_eq!(client.rest_url, "https://example.supabase.co/rest/v1");
    }

    #[test]
    fn test_user_since_filters() {
        let since = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
        let params = SupabaseStore::user_since("amount_ml", "abc", since);
        assert_eq!(
            params,
            vec![
                ("select", "amount_ml".to_string()),
                ("user_id", "eq.abc".to_string()),
                ("date", "gte.2024-03-03".to_string()),
            ]
        );
    }

    #[test]
    fn test_rows_with_null_values_sum_as_zero() {
        let rows: Vec<CaloriesRow> =
            serde_json::from_str(r#"[{"calories_burned":300},{"calories_burned":null}]"#)
                .unwrap();
        let total: i64 = rows.iter().filter_map(|r| r.calories_burned).sum();
        assert_eq!(total, 300);
        assert_eq!(rows.len(), 2);
    }
}
