// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user request generations.
//!
//! Each new leaderboard request from a user bumps that user's generation.
//! Older in-flight requests observe the bump and stop, so a slow response for
//! a previous timeframe never lands after the response for the current one.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

type Registry = DashMap<String, watch::Sender<u64>>;

/// Tracks the latest request generation per user.
#[derive(Clone, Default)]
pub struct RequestGenerations {
    latest: Arc<Registry>,
    // Shared across users so a generation is never reused after its entry is removed
    counter: Arc<AtomicU64>,
}

/// Handle for one in-flight request.
///
/// Dropping the ticket releases its bookkeeping, including when the request
/// future is abandoned mid-flight.
#[derive(Debug)]
pub struct RequestTicket {
    user_id: String,
    generation: u64,
    latest: watch::Receiver<u64>,
    registry: Arc<Registry>,
}

impl RequestGenerations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request for `user_id`, superseding any earlier one.
    pub fn begin(&self, user_id: &str) -> RequestTicket {
        let sender = self
            .latest
            .entry(user_id.to_string())
            .or_insert_with(|| watch::channel(0).0);

        // Allocated under the entry lock so generations stay ordered per user
        let generation = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        sender.send_replace(generation);
        let latest = sender.subscribe();
        drop(sender);

        tracing::debug!(user_id, generation, "Leaderboard request started");

        RequestTicket {
            user_id: user_id.to_string(),
            generation,
            latest,
            registry: Arc::clone(&self.latest),
        }
    }

    /// Drop bookkeeping for `ticket`'s user if no newer request exists.
    pub fn finish(&self, ticket: &RequestTicket) {
        ticket.release();
    }

    /// Number of users with a tracked request.
    pub fn tracked_users(&self) -> usize {
        self.latest.len()
    }
}

impl RequestTicket {
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether no newer request has been started for this user.
    pub fn is_current(&self) -> bool {
        *self.latest.borrow() == self.generation
    }

    /// Resolves once a newer request for the same user has started.
    pub async fn superseded(&mut self) {
        let generation = self.generation;
        // A closed channel means the bookkeeping went away; nothing can supersede us then.
        if self
            .latest
            .wait_for(|latest| *latest != generation)
            .await
            .is_err()
        {
            std::future::pending::<()>().await;
        }
    }

    fn release(&self) {
        self.registry
            .remove_if(&self.user_id, |_, sender| *sender.borrow() == self.generation);
    }
}

impl Drop for RequestTicket {
    fn drop(&mut self) {
        self.release();
    }
}
