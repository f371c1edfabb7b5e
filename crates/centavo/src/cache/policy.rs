use std::time::Duration;

/// Tunable staleness/refetch behavior for a [`QueryCache`](super::QueryCache).
///
/// All values are explicit so tests can pin them; defaults match the
/// interactive-app profile (short staleness window, generous idle GC).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// Age after which a cached value is considered stale even without
    /// explicit invalidation.
    pub stale_after: Duration,
    /// How long a fully unsubscribed entry may linger before the GC
    /// pass evicts it.
    pub idle_evict_after: Duration,
    /// Automatic retries for a failed fetch before the error is
    /// surfaced to the caller.
    pub retry_limit: u32,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            stale_after: Duration::from_secs(30),
            idle_evict_after: Duration::from_secs(300),
            retry_limit: 1,
        }
    }
}

impl CachePolicy {
    /// Sets the staleness window.
    pub fn with_stale_after(mut self, stale_after: Duration) -> Self {
        self.stale_after = stale_after;
        self
    }

    /// Sets the idle garbage-collection window.
    pub fn with_idle_evict_after(mut self, idle_evict_after: Duration) -> Self {
        self.idle_evict_after = idle_evict_after;
        self
    }

    /// Sets the automatic retry budget for failed fetches.
    pub fn with_retry_limit(mut self, retry_limit: u32) -> Self {
        self.retry_limit = retry_limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_values() {
        let policy = CachePolicy::default();
        assert_eq!(policy.stale_after, Duration::from_secs(30));
        assert_eq!(policy.idle_evict_after, Duration::from_secs(300));
        assert_eq!(policy.retry_limit, 1);
    }

    #[test]
    fn test_builder_overrides() {
        let policy = CachePolicy::default()
            .with_stale_after(Duration::from_secs(5))
            .with_idle_evict_after(Duration::from_secs(60))
            .with_retry_limit(0);

        assert_eq!(policy.stale_after, Duration::from_secs(5));
        assert_eq!(policy.idle_evict_after, Duration::from_secs(60));
        assert_eq!(policy.retry_limit, 0);
    }
}
