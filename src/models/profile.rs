// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile model (read-only, owned by Supabase Auth).

use serde::{Deserialize, Serialize};

/// Name shown for profiles whose `full_name` is missing or empty.
pub const ANONYMOUS_NAME: &str = "Anonymous";

/// Row of the `profiles` table, as far as the leaderboard needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Supabase user ID (UUID string)
    pub id: String,
    /// Display name; may be absent
    #[serde(default)]
    pub full_name: Option<String>,
    /// Server-maintained cumulative points
    #[serde(default)]
    pub total_points: i64,
}

impl Profile {
    pub fn new(id: impl Into<String>, full_name: Option<&str>, total_points: i64) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.map(str::to_string),
            total_points,
        }
    }

    /// Name to display on the leaderboard.
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => ANONYMOUS_NAME,
        }
    }
}
