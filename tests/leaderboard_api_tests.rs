// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard endpoint tests.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use fittrack::db::tables;
use fittrack::models::Profile;
use std::time::Duration;
use tower::ServiceExt;

mod common;

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_leaderboard_ranks_and_highlights_current_user() {
    let (app, state, store) = common::create_test_app();
    let today = chrono::Utc::now().date_naive();

    store.add_profile(Profile::new("ada", Some("Ada"), 500)).await;
    store.add_profile(Profile::new("bob", None, 300)).await;
    store.add_profile(Profile::new("cy", Some("Cy"), 100)).await;

    // ada: 1 workout -> 10 points; bob: 2 workouts + 1000 ml -> 70; cy: nothing
    store.add_workout("ada", today, 0).await;
    store.add_workout("bob", today, 0).await;
    store.add_workout("bob", today, 0).await;
    store.add_water("bob", today, 1000).await;

    let token = common::create_test_jwt("ada", &state.config.jwt_secret);
    let response = app
        .oneshot(get("/api/leaderboard?timeframe=week", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::read_json(response).await;
    assert_eq!(body["timeframe"], "week");

    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["user_id"], "bob");
    assert_eq!(entries[0]["full_name"], "Anonymous");
    assert_eq!(entries[0]["points"], 70);
    assert_eq!(entries[0]["rank"], 1);
    assert_eq!(entries[1]["user_id"], "ada");
    assert_eq!(entries[2]["points"], 0);

    assert_eq!(body["current_user_rank"], 2);
    assert_eq!(body["current_user_points"], 10);
}

#[tokio::test]
async fn test_leaderboard_default_timeframe_is_week() {
    let (app, state, _) = common::create_test_app();
    let token = common::create_test_jwt("ada", &state.config.jwt_secret);

    let response = app.oneshot(get("/api/leaderboard", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::read_json(response).await;
    assert_eq!(body["timeframe"], "week");
}

#[tokio::test]
async fn test_leaderboard_empty_roster() {
    let (app, state, _) = common::create_test_app();
    let token = common::create_test_jwt("ada", &state.config.jwt_secret);

    let response = app
        .oneshot(get("/api/leaderboard?timeframe=all", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::read_json(response).await;
    assert_eq!(body["entries"].as_array().unwrap().len(), 0);
    assert_eq!(body["current_user_rank"], 0);
    assert!(body["current_user_points"].is_null());
}

#[tokio::test]
async fn test_leaderboard_invalid_timeframe() {
    let (app, state, _) = common::create_test_app();
    let token = common::create_test_jwt("ada", &state.config.jwt_secret);

    let response = app
        .oneshot(get("/api/leaderboard?timeframe=year", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::read_json(response).await;
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_leaderboard_roster_failure_is_retryable_error() {
    let (app, state, store) = common::create_test_app();
    store.add_profile(Profile::new("ada", None, 1)).await;
    store.fail_table(tables::PROFILES).await;
    let token = common::create_test_jwt("ada", &state.config.jwt_secret);

    let response = app
        .oneshot(get("/api/leaderboard?timeframe=month", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = common::read_json(response).await;
    assert_eq!(body["error"], "roster_unavailable");
    assert_eq!(body["retryable"], true);
}

#[tokio::test]
async fn test_leaderboard_offline_store_is_not_an_empty_board() {
    let (app, state) = common::create_offline_test_app();
    let token = common::create_test_jwt("ada", &state.config.jwt_secret);

    let response = app.oneshot(get("/api/leaderboard", &token)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_leaderboard_partial_failure_is_invisible() {
    let (app, state, store) = common::create_test_app();
    let today = chrono::Utc::now().date_naive();

    store.add_profile(Profile::new("ada", Some("Ada"), 1)).await;
    store.add_workout("ada", today, 100).await;
    store.add_steps("ada", today, 5000).await;
    store.fail_table(tables::STEPS).await;

    let token = common::create_test_jwt("ada", &state.config.jwt_secret);
    let response = app
        .oneshot(get("/api/leaderboard?timeframe=all", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::read_json(response).await;
    let entry = &body["entries"][0];
    assert_eq!(entry["total_steps"], 0);
    // 10 + 0.1 * 100
    assert_eq!(entry["points"], 20);
}

#[tokio::test]
async fn test_scoring_rules() {
    let (app, state, _) = common::create_test_app();
    let token = common::create_test_jwt("ada", &state.config.jwt_secret);

    let response = app
        .oneshot(get("/api/leaderboard/scoring", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::read_json(response).await;
    assert_eq!(body["points_per_workout"], 10.0);
    assert_eq!(body["points_per_calorie"], 0.1);
    assert_eq!(body["points_per_step"], 0.01);
    assert_eq!(body["points_per_water_ml"], 0.05);
    assert_eq!(body["candidate_pool"], 20);
    assert_eq!(body["top_n"], 10);
}

#[tokio::test]
async fn test_superseded_request_returns_conflict() {
    let (app, state, store) = common::create_test_app();
    store.add_profile(Profile::new("ada", Some("Ada"), 1)).await;
    store
        .slow_table(tables::WORKOUTS, Duration::from_millis(300))
        .await;
    let token = common::create_test_jwt("ada", &state.config.jwt_secret);

    let stale = tokio::spawn(
        app.clone()
            .oneshot(get("/api/leaderboard?timeframe=all", &token)),
    );
    tokio::time::sleep(Duration::from_millis(50)).await;

    let fresh = app
        .oneshot(get("/api/leaderboard?timeframe=week", &token))
        .await
        .unwrap();
    assert_eq!(fresh.status(), StatusCode::OK);

    let stale = stale.await.unwrap().unwrap();
    assert_eq!(stale.status(), StatusCode::CONFLICT);
    let body = common::read_json(stale).await;
    assert_eq!(body["error"], "superseded");
    assert_eq!(state.leaderboard.requests().tracked_users(), 0);
}
