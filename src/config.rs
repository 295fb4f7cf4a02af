// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honored for local development.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Which `ActivityStore` implementation backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Hosted Supabase project (PostgREST).
    Supabase,
    /// Process-local store, empty at startup. Local development only.
    Memory,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Supabase => "supabase",
            StoreBackend::Memory => "memory",
        }
    }
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "supabase" => Ok(StoreBackend::Supabase),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(ConfigError::Invalid("STORE_BACKEND", s.to_string())),
        }
    }
}

/// Tuning knobs for leaderboard computation.
#[derive(Debug, Clone)]
pub struct LeaderboardSettings {
    /// Size of the candidate pool (top profiles by lifetime points).
    pub candidate_limit: u32,
    /// Number of entries returned.
    pub top_n: usize,
    /// Upper bound on each per-profile sub-query.
    pub query_timeout: Duration,
    /// Profiles aggregated concurrently.
    pub max_concurrency: usize,
}

impl Default for LeaderboardSettings {
    fn default() -> Self {
        Self {
            candidate_limit: 20,
            top_n: 10,
            query_timeout: Duration::from_millis(5000),
            max_concurrency: 8,
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Store implementation to use
    pub store_backend: StoreBackend,
    /// Supabase project URL (e.g. https://xyz.supabase.co)
    pub supabase_url: String,
    /// Supabase anon API key
    pub supabase_anon_key: String,
    /// HS256 secret used by Supabase Auth to sign access tokens
    pub jwt_secret: Vec<u8>,
    /// Frontend URL for CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Leaderboard tuning
    pub leaderboard: LeaderboardSettings,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let store_backend = match env::var("STORE_BACKEND") {
            Ok(v) => v.parse()?,
            Err(_) => StoreBackend::Supabase,
        };

        // Supabase credentials are only mandatory when we actually talk to Supabase.
        let (supabase_url, supabase_anon_key) = match store_backend {
            StoreBackend::Supabase => (
                env::var("SUPABASE_URL")
                    .map(|v| v.trim().trim_end_matches('/').to_string())
                    .map_err(|_| ConfigError::Missing("SUPABASE_URL"))?,
                env::var("SUPABASE_ANON_KEY")
                    .map(|v| v.trim().to_string())
                    .map_err(|_| ConfigError::Missing("SUPABASE_ANON_KEY"))?,
            ),
            StoreBackend::Memory => (
                env::var("SUPABASE_URL").unwrap_or_default(),
                env::var("SUPABASE_ANON_KEY").unwrap_or_default(),
            ),
        };

        let defaults = LeaderboardSettings::default();
        let leaderboard = LeaderboardSettings {
            candidate_limit: parse_var("LEADERBOARD_CANDIDATE_LIMIT", defaults.candidate_limit)?,
            top_n: parse_var("LEADERBOARD_TOP_N", defaults.top_n)?,
            query_timeout: Duration::from_millis(parse_var(
                "LEADERBOARD_QUERY_TIMEOUT_MS",
                defaults.query_timeout.as_millis() as u64,
            )?),
            max_concurrency: parse_var("LEADERBOARD_MAX_CONCURRENCY", defaults.max_concurrency)?
                .max(1),
        };

        Ok(Self {
            store_backend,
            supabase_url,
            supabase_anon_key,
            jwt_secret: env::var("SUPABASE_JWT_SECRET")
                .map_err(|_| ConfigError::Missing("SUPABASE_JWT_SECRET"))?
                .into_bytes(),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            leaderboard,
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            store_backend: StoreBackend::Memory,
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test_anon_key".to_string(),
            jwt_secret: b"test_jwt_secret_32_bytes_minimum".to_vec(),
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            leaderboard: LeaderboardSettings::default(),
        }
    }
}

/// Read an optional numeric variable, falling back to `default` when unset.
fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("STORE_BACKEND", "supabase");
        env::set_var("SUPABASE_URL", "https://example.supabase.co/");
        env::set_var("SUPABASE_ANON_KEY", " anon ");
        env::set_var("SUPABASE_JWT_SECRET", "test_jwt_secret_32_bytes_minimum");
        env::set_var("LEADERBOARD_TOP_N", "5");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.store_backend, StoreBackend::Supabase);
        assert_eq!(config.supabase_url, "https://example.supabase.co");
        assert_eq!(config.supabase_anon_key, "anon");
        assert_eq!(config.leaderboard.top_n, 5);
        assert_eq!(config.leaderboard.candidate_limit, 20);
        assert_eq!(config.port, 8080);

        env::remove_var("LEADERBOARD_TOP_N");
    }

    #[test]
    fn test_store_backend_parse() {
        assert_eq!(
            "Memory".parse::<StoreBackend>().unwrap(),
            StoreBackend::Memory
        );
        assert!(matches!(
            "postgres".parse::<StoreBackend>(),
            Err(ConfigError::Invalid("STORE_BACKEND", _))
        ));
    }
}
