//! Process-wide request cache with in-flight de-duplication

use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{self, BoxFuture, FutureExt, Shared};
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::policy::{CachePolicy, FetchOptions};
use super::subscription::Subscription;
use crate::domain::{downcast, ApiError, CacheEntry, EntryStatus, ErasedValue, ErrorInfo};

type Settled = Result<ErasedValue, ErrorInfo>;
type InFlight = Shared<BoxFuture<'static, Settled>>;

/// Callback invoked whenever a key settles (resolves or fails)
pub type Listener = Arc<dyn Fn(&CacheEntry) + Send + Sync>;

/// Handle for removing a listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Slot {
    state: watch::Sender<CacheEntry>,
    in_flight: Option<InFlight>,
    wave: u64,
    listeners: Vec<(ListenerId, Listener)>,
}

impl Slot {
    fn new(key: &str) -> Self {
        let (state, _) = watch::channel(CacheEntry::idle(key));
        Self {
            state,
            in_flight: None,
            wave: 0,
            listeners: Vec::new(),
        }
    }

    fn snapshot(&self) -> CacheEntry {
        self.state.borrow().clone()
    }
}

struct Inner {
    entries: Mutex<HashMap<String, Slot>>,
    policy: CachePolicy,
    next_listener: AtomicU64,
}

/// Keyed cache of backend results shared by every page
///
/// Each key runs at most one producer at a time. Subscribers that arrive while
/// a request is in flight attach to it; subscribers that arrive after it
/// resolved get the cached value immediately. Cloning is cheap and clones
/// share the same entries.
#[derive(Clone)]
pub struct RequestCache {
    inner: Arc<Inner>,
}

impl Default for RequestCache {
    fn default() -> Self {
        Self::new(CachePolicy::default())
    }
}

impl std::fmt::Debug for RequestCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestCache")
            .field("policy", &self.inner.policy)
            .field("entries", &self.len())
            .finish()
    }
}

impl RequestCache {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
                policy,
                next_listener: AtomicU64::new(1),
            }),
        }
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.inner.policy
    }

    /// Subscribes to `key`, running `producer` only if the key needs loading
    ///
    /// The producer is called synchronously while the entry map is locked, so
    /// it must only build its future and must not touch this cache. Must be
    /// called from within a tokio runtime.
    pub fn subscribe<T, F, Fut>(&self, key: impl Into<String>, producer: F) -> Subscription<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        self.subscribe_with_options(key, producer, FetchOptions::default())
    }

    pub fn subscribe_with_options<T, F, Fut>(
        &self,
        key: impl Into<String>,
        producer: F,
        options: FetchOptions,
    ) -> Subscription<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let (receiver, _) = self.acquire(key.into(), producer, &options, false);
        Subscription::new(receiver)
    }

    /// Starts a new request for `key` whatever its status
    ///
    /// If a request is already in flight the subscription attaches to it
    /// instead, so there is still only one request per key.
    pub fn refetch<T, F, Fut>(&self, key: impl Into<String>, producer: F) -> Subscription<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let (receiver, _) = self.acquire(key.into(), producer, &FetchOptions::default(), true);
        Subscription::new(receiver)
    }

    /// Like [`subscribe`](Self::subscribe) but waits for the settled value
    pub async fn fetch<T, F, Fut>(&self, key: impl Into<String>, producer: F) -> Result<Arc<T>, ErrorInfo>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let key = key.into();
        let (receiver, in_flight) =
            self.acquire(key.clone(), producer, &FetchOptions::default(), false);

        if let Some(in_flight) = in_flight {
            let value = in_flight.await?;
            return downcast(&key, value);
        }

        let entry = receiver.borrow().clone();
        match entry.status() {
            EntryStatus::Failed => Err(entry
                .error()
                .cloned()
                .unwrap_or_else(|| ErrorInfo::new("Request failed"))),
            _ => entry
                .value::<T>()?
                .ok_or_else(|| ErrorInfo::new(format!("No value cached for '{}'", key))),
        }
    }

    /// Snapshot of `key`, if it was ever requested
    pub fn entry(&self, key: &str) -> Option<CacheEntry> {
        self.lock().get(key).map(Slot::snapshot)
    }

    /// Registers a callback for every terminal transition of `key`
    pub fn on_settle<L>(&self, key: impl Into<String>, listener: L) -> ListenerId
    where
        L: Fn(&CacheEntry) + Send + Sync + 'static,
    {
        let key = key.into();
        let id = ListenerId(self.inner.next_listener.fetch_add(1, Ordering::Relaxed));

        let mut entries = self.lock();
        let slot = entries
            .entry(key.clone())
            .or_insert_with(|| Slot::new(&key));
        slot.listeners.push((id, Arc::new(listener)));

        id
    }

    pub fn remove_listener(&self, key: &str, id: ListenerId) -> bool {
        let mut entries = self.lock();
        let Some(slot) = entries.get_mut(key) else {
            return false;
        };

        let before = slot.listeners.len();
        slot.listeners.retain(|(existing, _)| *existing != id);
        slot.listeners.len() != before
    }

    pub fn keys(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Decides whether `key` needs a request and returns what to observe
    fn acquire<T, F, Fut>(
        &self,
        key: String,
        producer: F,
        options: &FetchOptions,
        force: bool,
    ) -> (watch::Receiver<CacheEntry>, Option<InFlight>)
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let ttl = options.ttl.or(self.inner.policy.ttl);

        let mut entries = self.lock();
        let slot = entries
            .entry(key.clone())
            .or_insert_with(|| Slot::new(&key));
        let current = slot.snapshot();

        let start = if slot.in_flight.is_some() {
            debug!(key = %key, "Attaching to in-flight request");
            false
        } else if force {
            debug!(key = %key, "Forced refetch");
            true
        } else {
            match current.status() {
                EntryStatus::Idle | EntryStatus::Loading => {
                    debug!(key = %key, "Cache miss");
                    true
                }
                EntryStatus::Resolved if current.is_fresh(ttl) => {
                    debug!(key = %key, "Cache hit");
                    false
                }
                EntryStatus::Resolved => {
                    debug!(key = %key, "Cached value is stale, refreshing");
                    true
                }
                EntryStatus::Failed => {
                    debug!(
                        key = %key,
                        retry = self.inner.policy.retry_on_subscribe,
                        "Previous request failed"
                    );
                    self.inner.policy.retry_on_subscribe
                }
            }
        };

        if start {
            self.start_wave(&key, slot, &current, producer);
        }

        (slot.state.subscribe(), slot.in_flight.clone())
    }

    /// Moves the entry to `Loading` and spawns the producer's future
    fn start_wave<T, F, Fut>(&self, key: &str, slot: &mut Slot, current: &CacheEntry, producer: F)
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        // A producer that panics before returning its future fails the wave
        // like one whose future panics
        let work: BoxFuture<'static, Settled> =
            match std::panic::catch_unwind(AssertUnwindSafe(producer)) {
                Ok(future) => async move {
                    match AssertUnwindSafe(future).catch_unwind().await {
                        Ok(Ok(value)) => Ok(Arc::new(value) as ErasedValue),
                        Ok(Err(error)) => Err(ErrorInfo::from(&error)),
                        Err(_) => Err(ErrorInfo::new("Request producer panicked")),
                    }
                }
                .boxed(),
                Err(_) => future::ready(Err(ErrorInfo::new("Request producer panicked"))).boxed(),
            };

        slot.wave += 1;
        let wave = slot.wave;
        slot.state.send_replace(current.to_loading());

        let cache = self.clone();
        let task_key = key.to_string();

        // Spawned so the request completes even if every subscriber goes away
        let handle = tokio::spawn(async move {
            let outcome = work.await;
            cache.settle(&task_key, wave, outcome.clone());
            outcome
        });

        let in_flight = async move {
            handle
                .await
                .unwrap_or_else(|e| Err(ErrorInfo::new(format!("Request task failed: {}", e))))
        }
        .boxed()
        .shared();

        slot.in_flight = Some(in_flight);
    }

    /// Swaps in the terminal snapshot for `wave` and notifies listeners
    fn settle(&self, key: &str, wave: u64, outcome: Settled) {
        let (snapshot, listeners) = {
            let mut entries = self.lock();
            let Some(slot) = entries.get_mut(key) else {
                return;
            };

            if slot.wave != wave {
                warn!(key = %key, wave, current = slot.wave, "Discarding superseded result");
                return;
            }

            let current = slot.snapshot();
            let next = match outcome {
                Ok(value) => {
                    debug!(key = %key, "Request resolved");
                    current.to_resolved(value, Instant::now())
                }
                Err(error) => {
                    warn!(key = %key, error = %error, stale = current.has_value(), "Request failed");
                    current.to_failed(error)
                }
            };

            slot.in_flight = None;
            slot.state.send_replace(next.clone());

            let listeners: Vec<Listener> = slot
                .listeners
                .iter()
                .map(|(_, listener)| listener.clone())
                .collect();
            (next, listeners)
        };

        for listener in listeners {
            listener(&snapshot);
        }
    }
}
