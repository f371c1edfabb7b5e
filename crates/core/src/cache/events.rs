use serde::{Deserialize, Serialize};

use super::keys::QueryKey;

/// Cache state transitions broadcast to subscribers.
///
/// Events fire after the transition has been applied, so a consumer
/// reacting to `Updated` will observe the new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SyncEvent {
    /// A fetch resolved and the cached value was replaced.
    Updated { key: QueryKey },
    /// The key was explicitly marked stale.
    Invalidated { key: QueryKey },
    /// A fetch failed after exhausting its retries; any previous value
    /// is still servable.
    Failed { key: QueryKey, message: String },
}

impl SyncEvent {
    /// The key this event is about.
    pub fn key(&self) -> &QueryKey {
        match self {
            SyncEvent::Updated { key }
            | SyncEvent::Invalidated { key }
            | SyncEvent::Failed { key, .. } => key,
        }
    }
}
