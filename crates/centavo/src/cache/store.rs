//! Stale-while-revalidate query cache.
//!
//! One [`QueryCache`] holds the last-known result for every query key a
//! session has read, plus its staleness and fetch state. Reads are
//! deduplicated while in flight, explicitly invalidated keys bypass the
//! cached value on the next read, and age-stale values are served
//! immediately while a background refetch runs. Consumers observe state
//! transitions through a broadcast event bus.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{broadcast, RwLock};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_stream::wrappers::BroadcastStream;

use centavo_core::cache::{
    from_cache_bytes, to_cache_bytes, CacheError, QueryKey, Result, SyncEvent,
};

use super::policy::CachePolicy;

/// Capacity of the cache-wide event bus.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Capacity of the per-fetch waiter channel. One message is ever sent.
const WAITER_CHANNEL_CAPACITY: usize = 4;

/// Type-erased fetch closure retained per key so trigger-driven
/// refetches can re-issue the query without the original caller.
pub type Fetcher = Arc<dyn Fn() -> BoxFuture<'static, Result<Vec<u8>>> + Send + Sync>;

type FetchOutcome = Result<Arc<Vec<u8>>>;

/// External condition that makes subscribed stale entries refetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// The host window regained input focus.
    Focus,
    /// The host page/tab became visible again.
    Visibility,
    /// Network connectivity transitioned from offline to online.
    Reconnect,
}

impl RefreshTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefreshTrigger::Focus => "focus",
            RefreshTrigger::Visibility => "visibility",
            RefreshTrigger::Reconnect => "reconnect",
        }
    }
}

/// Per-key cache state. Owned exclusively by [`QueryCache`].
#[derive(Default)]
struct CacheSlot {
    value: Option<Arc<Vec<u8>>>,
    fetched_at: Option<Instant>,
    /// Set by explicit invalidation; cleared only by a fetch that
    /// started after the invalidation (see `epoch`).
    invalidated: bool,
    /// Bumped on every invalidation so a fetch that raced one cannot
    /// clear the flag with data read before the write it covers.
    epoch: u64,
    last_error: Option<String>,
    subscribers: usize,
    idle_since: Option<Instant>,
    inflight: Option<broadcast::Sender<FetchOutcome>>,
    fetcher: Option<Fetcher>,
}

impl CacheSlot {
    fn new_idle(now: Instant) -> Self {
        Self {
            idle_since: Some(now),
            ..Default::default()
        }
    }

    fn stale_by_age(&self, stale_after: Duration) -> bool {
        match self.fetched_at {
            Some(at) => at.elapsed() >= stale_after,
            None => true,
        }
    }

    fn is_stale(&self, stale_after: Duration) -> bool {
        self.invalidated || self.stale_by_age(stale_after)
    }
}

/// How a read request will be satisfied. Computed under the write lock,
/// executed after it is released.
enum Plan {
    /// Fresh cached value.
    Hit(Arc<Vec<u8>>),
    /// Age-stale value served now; the sender is present when this call
    /// owns the background revalidation.
    StaleHit(Arc<Vec<u8>>, Option<broadcast::Sender<FetchOutcome>>),
    /// Another call already fetches this key; wait for its outcome.
    Wait(broadcast::Receiver<FetchOutcome>),
    /// No servable value; fetch inline.
    Fetch(broadcast::Sender<FetchOutcome>, u64),
}

/// In-memory, key-addressed store of query results with staleness
/// tracking, in-flight deduplication, and explicit invalidation.
///
/// Cheap to clone; clones share the same state. Instances are
/// independent, so tests create one per case instead of touching a
/// process-wide singleton.
#[derive(Clone)]
pub struct QueryCache {
    slots: Arc<RwLock<HashMap<QueryKey, CacheSlot>>>,
    events: broadcast::Sender<SyncEvent>,
    policy: CachePolicy,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(CachePolicy::default())
    }
}

impl QueryCache {
    /// Creates an empty cache governed by `policy`.
    pub fn new(policy: CachePolicy) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            slots: Arc::new(RwLock::new(HashMap::new())),
            events,
            policy,
        }
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    /// Subscribes to cache state transitions for all keys.
    pub fn events(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    /// The event bus as a `Stream`, for consumers driving a select loop.
    pub fn event_stream(&self) -> BroadcastStream<SyncEvent> {
        BroadcastStream::new(self.events.subscribe())
    }

    fn emit(&self, event: SyncEvent) {
        // No receivers just means nobody is watching right now.
        let _ = self.events.send(event);
    }

    /// Registers a consumer's interest in `key` and returns an event
    /// receiver. Subscribed entries participate in trigger-driven
    /// refetches and are exempt from idle GC until [`Self::unsubscribe`]
    /// brings their count back to zero.
    pub async fn subscribe(&self, key: &QueryKey) -> broadcast::Receiver<SyncEvent> {
        let mut slots = self.slots.write().await;
        let slot = slots
            .entry(key.clone())
            .or_insert_with(|| CacheSlot::new_idle(Instant::now()));
        slot.subscribers += 1;
        slot.idle_since = None;
        self.events.subscribe()
    }

    /// Drops one subscription for `key`. When the last subscriber
    /// leaves, the idle-GC clock starts.
    pub async fn unsubscribe(&self, key: &QueryKey) {
        let mut slots = self.slots.write().await;
        if let Some(slot) = slots.get_mut(key) {
            slot.subscribers = slot.subscribers.saturating_sub(1);
            if slot.subscribers == 0 {
                slot.idle_since = Some(Instant::now());
            }
        }
    }

    /// Typed read-through. `fetch_fn` is invoked only on a cache miss,
    /// an explicit invalidation, or a background revalidation; its
    /// result is stored as JSON bytes under `key`.
    pub async fn fetch_with<T, F, Fut>(&self, key: &QueryKey, fetch_fn: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let fetcher: Fetcher = Arc::new(move || {
            let fut = fetch_fn();
            Box::pin(async move { to_cache_bytes(&fut.await?) })
        });
        let bytes = self.fetch_bytes(key, fetcher).await?;
        from_cache_bytes(&bytes)
    }

    /// Byte-level read-through underlying [`Self::fetch_with`].
    ///
    /// Explicitly invalidated keys bypass the cached value (the next
    /// read re-fetches); age-stale keys serve the cached value and
    /// revalidate in the background; concurrent reads of one key share
    /// a single store query.
    pub async fn fetch_bytes(&self, key: &QueryKey, fetcher: Fetcher) -> FetchOutcome {
        let plan = {
            let mut slots = self.slots.write().await;
            let slot = slots
                .entry(key.clone())
                .or_insert_with(|| CacheSlot::new_idle(Instant::now()));
            // Retain the latest fetcher for trigger-driven refetches.
            slot.fetcher = Some(fetcher.clone());

            match &slot.value {
                Some(value) if !slot.invalidated => {
                    let value = value.clone();
                    if !slot.stale_by_age(self.policy.stale_after) {
                        Plan::Hit(value)
                    } else if slot.inflight.is_some() {
                        Plan::StaleHit(value, None)
                    } else {
                        let (tx, _) = broadcast::channel(WAITER_CHANNEL_CAPACITY);
                        slot.inflight = Some(tx.clone());
                        Plan::StaleHit(value, Some(tx))
                    }
                }
                // Invalidated or empty: the cached value may not be
                // served; join the in-flight fetch or issue one.
                _ => match &slot.inflight {
                    Some(tx) => Plan::Wait(tx.subscribe()),
                    None => {
                        let (tx, _) = broadcast::channel(WAITER_CHANNEL_CAPACITY);
                        slot.inflight = Some(tx.clone());
                        Plan::Fetch(tx, slot.epoch)
                    }
                },
            }
        };

        match plan {
            Plan::Hit(value) => {
                tracing::trace!(key = %key, "Cache hit");
                Ok(value)
            }
            Plan::StaleHit(value, revalidation) => {
                tracing::trace!(key = %key, "Serving stale value while revalidating");
                if let Some(waiters) = revalidation {
                    let cache = self.clone();
                    let key = key.clone();
                    // Epoch snapshot is irrelevant here: the slot was
                    // not invalidated when the plan was made, and a
                    // later invalidation bumps the epoch past ours.
                    let epoch = {
                        let slots = cache.slots.read().await;
                        slots.get(&key).map(|slot| slot.epoch).unwrap_or_default()
                    };
                    tokio::spawn(async move {
                        let _ = cache.run_fetch(key, fetcher, waiters, epoch).await;
                    });
                }
                Ok(value)
            }
            Plan::Wait(mut rx) => {
                tracing::trace!(key = %key, "Joining in-flight fetch");
                match rx.recv().await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(CacheError::Abandoned),
                }
            }
            Plan::Fetch(waiters, epoch) => {
                tracing::trace!(key = %key, "Cache miss");
                self.run_fetch(key.clone(), fetcher, waiters, epoch).await
            }
        }
    }

    /// Runs one fetch (plus automatic retries), applies the outcome to
    /// the slot, notifies waiters, and emits the matching event.
    async fn run_fetch(
        &self,
        key: QueryKey,
        fetcher: Fetcher,
        waiters: broadcast::Sender<FetchOutcome>,
        started_epoch: u64,
    ) -> FetchOutcome {
        let mut attempt: u32 = 0;
        let outcome: FetchOutcome = loop {
            match fetcher().await {
                Ok(bytes) => break Ok(Arc::new(bytes)),
                Err(error) if attempt < self.policy.retry_limit => {
                    attempt += 1;
                    tracing::debug!(key = %key, attempt, error = %error, "Fetch failed, retrying");
                }
                Err(error) => break Err(error),
            }
        };

        {
            let mut slots = self.slots.write().await;
            if let Some(slot) = slots.get_mut(&key) {
                slot.inflight = None;
                match &outcome {
                    Ok(bytes) => {
                        slot.value = Some(bytes.clone());
                        slot.fetched_at = Some(Instant::now());
                        slot.last_error = None;
                        // An invalidation that landed while this fetch
                        // was in flight may cover a write the fetch did
                        // not observe; only a fetch started at the
                        // current epoch may clear the flag.
                        if slot.epoch == started_epoch {
                            slot.invalidated = false;
                        }
                    }
                    Err(error) => {
                        slot.last_error = Some(error.to_string());
                    }
                }
            }
        }

        match &outcome {
            Ok(_) => self.emit(SyncEvent::Updated { key: key.clone() }),
            Err(error) => {
                tracing::warn!(key = %key, error = %error, "Fetch failed after retries");
                self.emit(SyncEvent::Failed {
                    key: key.clone(),
                    message: error.to_string(),
                });
            }
        }

        let _ = waiters.send(outcome.clone());
        outcome
    }

    /// Marks every cached key that `key` is a prefix of as stale and
    /// returns how many entries were newly marked. Values are kept; the
    /// next read of a marked key bypasses them and re-fetches.
    pub async fn invalidate(&self, key: &QueryKey) -> usize {
        let mut marked = Vec::new();
        {
            let mut slots = self.slots.write().await;
            for (slot_key, slot) in slots.iter_mut() {
                if key.is_prefix_of(slot_key) && !slot.invalidated {
                    slot.invalidated = true;
                    slot.epoch += 1;
                    marked.push(slot_key.clone());
                }
            }
        }
        for slot_key in &marked {
            self.emit(SyncEvent::Invalidated {
                key: slot_key.clone(),
            });
        }
        if !marked.is_empty() {
            tracing::debug!(key = %key, count = marked.len(), "Invalidated cached queries");
        }
        marked.len()
    }

    /// Refetches every entry that is stale and currently subscribed.
    /// Returns the number of refetches started. Unobserved keys are
    /// never speculatively refetched.
    pub async fn refresh(&self, trigger: RefreshTrigger) -> usize {
        let mut jobs = Vec::new();
        {
            let mut slots = self.slots.write().await;
            for (key, slot) in slots.iter_mut() {
                if slot.subscribers == 0
                    || slot.inflight.is_some()
                    || !slot.is_stale(self.policy.stale_after)
                {
                    continue;
                }
                let Some(fetcher) = slot.fetcher.clone() else {
                    continue;
                };
                let (tx, _) = broadcast::channel(WAITER_CHANNEL_CAPACITY);
                slot.inflight = Some(tx.clone());
                jobs.push((key.clone(), fetcher, tx, slot.epoch));
            }
        }

        let started = jobs.len();
        if started > 0 {
            tracing::debug!(
                trigger = trigger.as_str(),
                count = started,
                "Refetching stale subscribed queries"
            );
        }
        for (key, fetcher, waiters, epoch) in jobs {
            let cache = self.clone();
            tokio::spawn(async move {
                let _ = cache.run_fetch(key, fetcher, waiters, epoch).await;
            });
        }
        started
    }

    /// Evicts entries that have been unsubscribed longer than the idle
    /// window. Returns the number of entries removed.
    pub async fn evict_idle(&self) -> usize {
        let mut slots = self.slots.write().await;
        let before = slots.len();
        slots.retain(|_, slot| {
            slot.subscribers > 0
                || slot.inflight.is_some()
                || slot
                    .idle_since
                    .is_none_or(|since| since.elapsed() < self.policy.idle_evict_after)
        });
        let evicted = before - slots.len();
        if evicted > 0 {
            tracing::debug!(evicted, "Evicted idle cache entries");
        }
        evicted
    }

    /// Spawns the periodic idle-GC task. Aborting the handle stops it.
    pub fn start_gc(&self) -> tokio::task::JoinHandle<()> {
        let cache = self.clone();
        let period = cache.policy.idle_evict_after.max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                cache.evict_idle().await;
            }
        })
    }

    /// Returns the cached value for `key` without fetching or touching
    /// staleness state.
    pub async fn peek<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let bytes = {
            let slots = self.slots.read().await;
            slots.get(key)?.value.clone()?
        };
        from_cache_bytes(&bytes).ok()
    }

    /// Whether the entry for `key` is currently stale (by age or by
    /// explicit invalidation). `None` when the key has no entry.
    pub async fn stale(&self, key: &QueryKey) -> Option<bool> {
        let slots = self.slots.read().await;
        slots
            .get(key)
            .map(|slot| slot.is_stale(self.policy.stale_after))
    }

    /// Last fetch error recorded for `key`, if any.
    pub async fn last_error(&self, key: &QueryKey) -> Option<String> {
        let slots = self.slots.read().await;
        slots.get(key).and_then(|slot| slot.last_error.clone())
    }

    /// Number of entries currently held.
    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }
}
