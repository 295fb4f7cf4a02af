// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod leaderboard;
pub mod requests;

pub use leaderboard::LeaderboardEngine;
pub use requests::{RequestGenerations, RequestTicket};
