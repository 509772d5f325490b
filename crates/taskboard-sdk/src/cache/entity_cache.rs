//! Keyed query cache with request coalescing
//!
//! Each key maps to its last-known value plus loading and error state.
//! Concurrent fetches of one key share a single gateway call: the first caller
//! registers a broadcast channel and becomes the leader, later callers
//! subscribe to it and wait.
//!
//! Every entry carries an epoch drawn from one cache-wide counter. `set`,
//! `invalidate` and `cancel` move it forward, and an entry recreated after
//! `remove` or `clear` starts from a fresh value. A fetch only writes its result
//! back if the epoch it started under is still current and its in-flight
//! registration is still the live one, so an outdated response never
//! overwrites newer data.

use super::keys::{KeyPrefix, QueryKey};
use crate::config::CacheConfig;
use crate::error::{Result, SdkError};
use crate::gateway::Gateway;
use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio::time::Instant;
use tracing::{debug, info, warn};

type FetchResult = Result<Arc<Value>>;

/// Loading state of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Never loaded
    Pending,
    /// Last load succeeded
    Success,
    /// The gateway has nothing under this key
    Empty,
    /// Last load failed; earlier data, if any, is retained
    Error,
}

/// Point-in-time view of a cache entry
#[derive(Debug, Clone)]
pub struct QuerySnapshot {
    pub status: QueryStatus,
    pub data: Option<Arc<Value>>,
    pub error: Option<SdkError>,
    /// Invalidated or older than the stale time
    pub is_stale: bool,
    pub is_fetching: bool,
}

impl QuerySnapshot {
    /// Decode the cached value into an entity type
    pub fn decode<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        self.data
            .as_deref()
            .map(|value| T::deserialize(value).map_err(SdkError::from))
            .transpose()
    }
}

/// What happened to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheEventKind {
    Updated,
    Failed,
    Invalidated,
    Removed,
}

/// Change notification delivered to subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEvent {
    pub key: QueryKey,
    pub kind: CacheEventKind,
}

#[derive(Debug)]
struct CacheEntry {
    data: Option<Arc<Value>>,
    error: Option<SdkError>,
    status: QueryStatus,
    stale: bool,
    epoch: u64,
    updated_at: Option<Instant>,
}

impl CacheEntry {
    fn new(epoch: u64) -> Self {
        Self {
            data: None,
            error: None,
            status: QueryStatus::Pending,
            stale: false,
            epoch,
            updated_at: None,
        }
    }
}

struct Inner {
    gateway: Arc<dyn Gateway>,
    config: CacheConfig,
    entries: DashMap<QueryKey, CacheEntry>,
    /// Source of entry epochs; never reset
    epochs: AtomicU64,
    in_flight: DashMap<QueryKey, broadcast::Sender<FetchResult>>,
    /// Live subscriber count per key
    watchers: DashMap<QueryKey, usize>,
    events: broadcast::Sender<CacheEvent>,
}

enum Role {
    Leader(broadcast::Sender<FetchResult>, u64),
    Follower(broadcast::Receiver<FetchResult>),
}

/// Drops the in-flight registration if the leading fetch is abandoned
struct InFlightGuard<'a> {
    in_flight: &'a DashMap<QueryKey, broadcast::Sender<FetchResult>>,
    key: &'a QueryKey,
    sender: &'a broadcast::Sender<FetchResult>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        // Only our own registration; invalidate may have replaced it
        self.in_flight
            .remove_if(self.key, |_, current| current.same_channel(self.sender));
    }
}

/// Shared query cache. Cloning is cheap and clones share state.
#[derive(Clone)]
pub struct EntityCache {
    inner: Arc<Inner>,
}

impl EntityCache {
    pub fn new(gateway: Arc<dyn Gateway>, config: CacheConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            inner: Arc::new(Inner {
                gateway,
                config,
                entries: DashMap::new(),
                epochs: AtomicU64::new(0),
                in_flight: DashMap::new(),
                watchers: DashMap::new(),
                events,
            }),
        }
    }

    pub fn gateway(&self) -> &Arc<dyn Gateway> {
        &self.inner.gateway
    }

    pub fn config(&self) -> &CacheConfig {
        &self.inner.config
    }

    /// Current state of a key, including stale data
    pub fn get(&self, key: &QueryKey) -> QuerySnapshot {
        let is_fetching = self.inner.in_flight.contains_key(key);
        match self.inner.entries.get(key) {
            Some(entry) => QuerySnapshot {
                status: entry.status,
                data: entry.data.clone(),
                error: entry.error.clone(),
                is_stale: entry.stale || self.is_expired(&entry),
                is_fetching,
            },
            None => QuerySnapshot {
                status: QueryStatus::Pending,
                data: None,
                error: None,
                is_stale: true,
                is_fetching,
            },
        }
    }

    /// Store a value directly. Any fetch already running for the key will not
    /// overwrite it.
    pub fn set(&self, key: QueryKey, value: Value) {
        {
            let epoch = self.next_epoch();
            let mut entry = self
                .inner
                .entries
                .entry(key.clone())
                .or_insert_with(|| CacheEntry::new(epoch));
            entry.epoch = epoch;
            entry.data = Some(Arc::new(value));
            entry.error = None;
            entry.status = QueryStatus::Success;
            entry.stale = false;
            entry.updated_at = Some(Instant::now());
        }
        debug!(key = %key, "cache set");
        self.emit(key, CacheEventKind::Updated);
    }

    /// Serve a fresh cached value or load it from the gateway.
    ///
    /// Concurrent calls for the same key result in one gateway call.
    pub async fn fetch(&self, key: &QueryKey) -> Result<Arc<Value>> {
        loop {
            if let Some(result) = self.fresh(key) {
                debug!(key = %key, "cache hit");
                return result;
            }

            match self.join_or_lead(key) {
                Role::Follower(mut receiver) => {
                    debug!(key = %key, "joining in-flight fetch");
                    match receiver.recv().await {
                        Ok(result) => return result,
                        // Leader abandoned; try again
                        Err(_) => continue,
                    }
                }
                Role::Leader(sender, epoch) => return self.lead_fetch(key, sender, epoch).await,
            }
        }
    }

    /// `fetch`, decoded into an entity type.
    ///
    /// A value that does not decode counts as a failed fetch for the key.
    pub async fn fetch_as<T: DeserializeOwned>(&self, key: &QueryKey) -> Result<T> {
        let value = self.fetch(key).await?;
        T::deserialize(&*value).map_err(|e| {
            let err = SdkError::Serialization(format!("{}: {}", key, e));
            self.record_error(key, err.clone());
            err
        })
    }

    /// Mark a key and every key extending it stale
    pub fn invalidate(&self, key: &QueryKey) -> usize {
        self.invalidate_prefix(&key.as_prefix())
    }

    /// Mark every key under `prefix` stale.
    ///
    /// Fetches already running for those keys are detached: they still answer
    /// their callers but no longer write to the cache. Keys with subscribers
    /// are refetched in the background.
    pub fn invalidate_prefix(&self, prefix: &KeyPrefix) -> usize {
        let mut invalidated = Vec::new();
        for mut entry in self.inner.entries.iter_mut() {
            if entry.key().starts_with(prefix) {
                entry.stale = true;
                entry.epoch = self.next_epoch();
                invalidated.push(entry.key().clone());
            }
        }
        self.inner.in_flight.retain(|key, _| !key.starts_with(prefix));

        info!(prefix = %prefix, count = invalidated.len(), "invalidated");

        for key in &invalidated {
            self.emit(key.clone(), CacheEventKind::Invalidated);
            if self.is_watched(key) {
                self.refetch_in_background(key.clone());
            }
        }
        invalidated.len()
    }

    /// Drop interest in a running fetch; its result will not be stored
    pub fn cancel(&self, key: &QueryKey) {
        if let Some(mut entry) = self.inner.entries.get_mut(key) {
            entry.epoch = self.next_epoch();
        }
        if self.inner.in_flight.remove(key).is_some() {
            debug!(key = %key, "cancelled in-flight fetch");
        }
    }

    /// Discard one entry
    pub fn remove(&self, key: &QueryKey) {
        self.inner.in_flight.remove(key);
        if self.inner.entries.remove(key).is_some() {
            self.emit(key.clone(), CacheEventKind::Removed);
        }
    }

    /// Discard everything
    pub fn clear(&self) {
        let keys: Vec<QueryKey> = self.inner.entries.iter().map(|e| e.key().clone()).collect();
        self.inner.in_flight.clear();
        self.inner.entries.clear();
        info!(count = keys.len(), "cache cleared");
        for key in keys {
            self.emit(key, CacheEventKind::Removed);
        }
    }

    /// Receive change events for `keys`
    pub fn subscribe<I>(&self, keys: I) -> Subscription
    where
        I: IntoIterator<Item = QueryKey>,
    {
        let keys: Vec<QueryKey> = keys.into_iter().collect();
        for key in &keys {
            *self.inner.watchers.entry(key.clone()).or_insert(0) += 1;
        }
        Subscription {
            receiver: self.inner.events.subscribe(),
            keys,
            inner: self.inner.clone(),
        }
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }

    /// Number of keys with a fetch in progress
    pub fn in_flight_count(&self) -> usize {
        self.inner.in_flight.len()
    }

    // ==================== Internals ====================

    fn next_epoch(&self) -> u64 {
        self.inner.epochs.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn is_expired(&self, entry: &CacheEntry) -> bool {
        entry
            .updated_at
            .map_or(true, |at| at.elapsed() >= self.inner.config.stale_time)
    }

    fn fresh(&self, key: &QueryKey) -> Option<FetchResult> {
        let entry = self.inner.entries.get(key)?;
        if entry.stale || self.is_expired(&entry) {
            return None;
        }
        match entry.status {
            QueryStatus::Success => entry.data.clone().map(Ok),
            QueryStatus::Empty => Some(Err(SdkError::NotFound(key.to_string()))),
            QueryStatus::Pending | QueryStatus::Error => None,
        }
    }

    fn join_or_lead(&self, key: &QueryKey) -> Role {
        let sender = match self.inner.in_flight.entry(key.clone()) {
            MapEntry::Occupied(in_flight) => return Role::Follower(in_flight.get().subscribe()),
            MapEntry::Vacant(slot) => {
                let (sender, _) = broadcast::channel(1);
                slot.insert(sender.clone());
                sender
            }
        };

        let epoch = self
            .inner
            .entries
            .entry(key.clone())
            .or_insert_with(|| CacheEntry::new(self.next_epoch()))
            .epoch;
        Role::Leader(sender, epoch)
    }

    async fn lead_fetch(
        &self,
        key: &QueryKey,
        sender: broadcast::Sender<FetchResult>,
        epoch: u64,
    ) -> FetchResult {
        let guard = InFlightGuard {
            in_flight: &self.inner.in_flight,
            key,
            sender: &sender,
        };
        let started = Instant::now();
        debug!(key = %key, gateway = self.inner.gateway.id(), "fetching");

        let result = self.inner.gateway.fetch(key).await.map(Arc::new);
        self.apply(key, epoch, &sender, &result);

        drop(guard);
        debug!(
            key = %key,
            waiting = sender.receiver_count(),
            duration_ms = started.elapsed().as_millis() as u64,
            success = result.is_ok(),
            "fetch complete"
        );
        // Receivers may have gone away
        let _ = sender.send(result.clone());
        result
    }

    fn apply(
        &self,
        key: &QueryKey,
        epoch: u64,
        sender: &broadcast::Sender<FetchResult>,
        result: &FetchResult,
    ) {
        let kind = {
            let Some(mut entry) = self.inner.entries.get_mut(key) else {
                debug!(key = %key, "entry removed during fetch, discarding result");
                return;
            };
            if entry.epoch != epoch {
                debug!(key = %key, "discarding outdated fetch result");
                return;
            }
            let registered = self
                .inner
                .in_flight
                .get(key)
                .map_or(false, |current| current.same_channel(sender));
            if !registered {
                debug!(key = %key, "fetch detached, discarding result");
                return;
            }

            match result {
                Ok(value) => {
                    entry.data = Some(value.clone());
                    entry.error = None;
                    entry.status = QueryStatus::Success;
                    entry.stale = false;
                    entry.updated_at = Some(Instant::now());
                    CacheEventKind::Updated
                }
                Err(SdkError::NotFound(_)) => {
                    entry.data = None;
                    entry.error = None;
                    entry.status = QueryStatus::Empty;
                    entry.stale = false;
                    entry.updated_at = Some(Instant::now());
                    CacheEventKind::Updated
                }
                Err(err) => {
                    warn!(key = %key, error = %err, "fetch failed, keeping last data");
                    entry.error = Some(err.clone());
                    entry.status = QueryStatus::Error;
                    CacheEventKind::Failed
                }
            }
        };
        self.emit(key.clone(), kind);
    }

    fn record_error(&self, key: &QueryKey, err: SdkError) {
        if let Some(mut entry) = self.inner.entries.get_mut(key) {
            entry.error = Some(err);
            entry.status = QueryStatus::Error;
        }
        self.emit(key.clone(), CacheEventKind::Failed);
    }

    fn is_watched(&self, key: &QueryKey) -> bool {
        self.inner.watchers.get(key).map_or(false, |count| *count > 0)
    }

    fn refetch_in_background(&self, key: QueryKey) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!(key = %key, "no runtime, skipping background refetch");
            return;
        };
        let cache = self.clone();
        handle.spawn(async move {
            if let Err(err) = cache.fetch(&key).await {
                debug!(key = %key, error = %err, "background refetch failed");
            }
        });
    }

    fn emit(&self, key: QueryKey, kind: CacheEventKind) {
        // No subscribers is fine
        let _ = self.inner.events.send(CacheEvent { key, kind });
    }
}

/// Change events for a fixed set of keys.
///
/// While alive, its keys are refetched as soon as they are invalidated.
pub struct Subscription {
    receiver: broadcast::Receiver<CacheEvent>,
    keys: Vec<QueryKey>,
    inner: Arc<Inner>,
}

impl Subscription {
    pub fn keys(&self) -> &[QueryKey] {
        &self.keys
    }

    /// Wait for the next event on one of the subscribed keys
    pub async fn recv(&mut self) -> Option<CacheEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.keys.contains(&event.key) => return Some(event),
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "subscriber lagged, events dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next already-delivered event, without waiting
    pub fn try_recv(&mut self) -> Option<CacheEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.keys.contains(&event.key) => return Some(event),
                Ok(_) => continue,
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "subscriber lagged, events dropped");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        for key in &self.keys {
            if let MapEntry::Occupied(mut watched) = self.inner.watchers.entry(key.clone()) {
                *watched.get_mut() -= 1;
                if *watched.get() == 0 {
                    watched.remove();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockGateway;
    use serde_json::json;

    fn cache_with(gateway: MockGateway) -> (EntityCache, Arc<MockGateway>) {
        let gateway = Arc::new(gateway);
        let cache = EntityCache::new(gateway.clone(), CacheConfig::default());
        (cache, gateway)
    }

    #[test]
    fn test_unknown_key_is_pending() {
        let (cache, _) = cache_with(MockGateway::new());
        let snapshot = cache.get(&QueryKey::User);
        assert_eq!(snapshot.status, QueryStatus::Pending);
        assert!(snapshot.data.is_none());
        assert!(snapshot.is_stale);
    }

    #[test]
    fn test_set_then_get() {
        let (cache, _) = cache_with(MockGateway::new());
        cache.set(QueryKey::User, json!({"_id": "u1", "name": "Ana", "email": "a@x.io"}));

        let snapshot = cache.get(&QueryKey::User);
        assert_eq!(snapshot.status, QueryStatus::Success);
        assert!(!snapshot.is_stale);
        let user: taskboard_client::User = snapshot.decode().unwrap().unwrap();
        assert_eq!(user.name, "Ana");
    }

    #[test]
    fn test_invalidate_keeps_data_readable() {
        let (cache, _) = cache_with(MockGateway::new());
        cache.set(QueryKey::WorkspaceStats("w1".into()), json!({"stats": {}}));
        cache.set(QueryKey::Workspaces, json!([]));

        assert_eq!(cache.invalidate(&QueryKey::Workspace("w1".into())), 1);

        let snapshot = cache.get(&QueryKey::WorkspaceStats("w1".into()));
        assert!(snapshot.is_stale);
        assert!(snapshot.data.is_some());
        assert!(!cache.get(&QueryKey::Workspaces).is_stale);
    }

    #[tokio::test]
    async fn test_fresh_value_is_served_from_cache() {
        let (cache, gateway) =
            cache_with(MockGateway::new().with_response(QueryKey::Workspaces, json!([])));

        cache.fetch(&QueryKey::Workspaces).await.unwrap();
        cache.fetch(&QueryKey::Workspaces).await.unwrap();
        assert_eq!(gateway.fetch_count(&QueryKey::Workspaces), 1);
    }

    #[tokio::test]
    async fn test_not_found_is_empty_not_error() {
        let (cache, _) = cache_with(MockGateway::new());
        let result = cache.fetch(&QueryKey::Task("gone".into())).await;
        assert!(matches!(result, Err(SdkError::NotFound(_))));

        let snapshot = cache.get(&QueryKey::Task("gone".into()));
        assert_eq!(snapshot.status, QueryStatus::Empty);
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn test_malformed_value_is_fetch_error() {
        let (cache, _) = cache_with(
            MockGateway::new().with_response(QueryKey::User, json!({"unexpected": true})),
        );
        let result = cache.fetch_as::<taskboard_client::User>(&QueryKey::User).await;
        assert!(matches!(result, Err(SdkError::Serialization(_))));
        assert_eq!(cache.get(&QueryKey::User).status, QueryStatus::Error);
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let (cache, _) = cache_with(MockGateway::new());
        cache.set(QueryKey::User, json!({}));
        cache.set(QueryKey::Workspaces, json!([]));
        let mut subscription = cache.subscribe([QueryKey::User]);

        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(
            subscription.try_recv(),
            Some(CacheEvent {
                key: QueryKey::User,
                kind: CacheEventKind::Removed
            })
        );
    }
}
