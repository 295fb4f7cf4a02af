// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// The candidate-profile query failed; no leaderboard can be built.
    #[error("Profile fetch failed: {0}")]
    RosterFetch(String),

    /// A single store query failed.
    #[error("Store error: {0}")]
    Store(String),

    /// A newer leaderboard request from the same user replaced this one.
    #[error("Request superseded by a newer request")]
    Superseded,
}

impl AppError {
    /// Whether the caller may reasonably retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::RosterFetch(_) | AppError::Store(_))
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    retryable: bool,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let retryable = self.is_retryable();
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token", None),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::RosterFetch(msg) => {
                tracing::error!(error = %msg, "Leaderboard roster fetch failed");
                (StatusCode::SERVICE_UNAVAILABLE, "roster_unavailable", None)
            }
            AppError::Store(msg) => {
                tracing::error!(error = %msg, "Store error");
                (StatusCode::BAD_GATEWAY, "store_error", None)
            }
            AppError::Superseded => (StatusCode::CONFLICT, "superseded", None),
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
            retryable,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
