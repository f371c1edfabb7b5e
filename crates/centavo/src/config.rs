use std::{env, time::Duration};

use crate::cache::CachePolicy;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Staleness window in seconds (default: 30)
    pub stale_after_seconds: u64,
    /// Idle garbage-collection window in seconds (default: 300)
    pub idle_evict_seconds: u64,
    /// Automatic retries for failed reads (default: 1)
    pub fetch_retry_limit: u32,
    /// Path to SQLite database file (default: "centavo.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub sqlite_path: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `STALE_AFTER_SECONDS` - Staleness window (default: 30)
    /// - `IDLE_EVICT_SECONDS` - Idle GC window (default: 300)
    /// - `FETCH_RETRY_LIMIT` - Automatic read retries (default: 1)
    /// - `SQLITE_PATH` - SQLite database path (default: "centavo.db")
    pub fn from_env() -> Self {
        Self {
            stale_after_seconds: env::var("STALE_AFTER_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            idle_evict_seconds: env::var("IDLE_EVICT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            fetch_retry_limit: env::var("FETCH_RETRY_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "centavo.db".to_string()),
        }
    }

    /// The cache policy described by this configuration.
    pub fn cache_policy(&self) -> CachePolicy {
        CachePolicy::default()
            .with_stale_after(Duration::from_secs(self.stale_after_seconds))
            .with_idle_evict_after(Duration::from_secs(self.idle_evict_seconds))
            .with_retry_limit(self.fetch_retry_limit)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
