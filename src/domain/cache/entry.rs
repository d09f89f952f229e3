//! Cache entry snapshots and the state exposed to subscribers

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::domain::ErrorInfo;

/// Type-erased cached payload
pub type ErasedValue = Arc<dyn Any + Send + Sync>;

/// Lifecycle of a cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryStatus {
    Idle,
    Loading,
    Resolved,
    Failed,
}

impl EntryStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved | Self::Failed)
    }
}

/// Immutable snapshot of one cache key
///
/// State transitions build a new snapshot instead of editing fields in place,
/// so readers never see a half-updated entry.
#[derive(Clone)]
pub struct CacheEntry {
    key: Arc<str>,
    status: EntryStatus,
    value: Option<ErasedValue>,
    error: Option<ErrorInfo>,
    fetched_at: Option<Instant>,
}

impl CacheEntry {
    pub fn idle(key: impl Into<Arc<str>>) -> Self {
        Self {
            key: key.into(),
            status: EntryStatus::Idle,
            value: None,
            error: None,
            fetched_at: None,
        }
    }

    /// A new loading wave; the previous value stays visible
    pub fn to_loading(&self) -> Self {
        Self {
            key: self.key.clone(),
            status: EntryStatus::Loading,
            value: self.value.clone(),
            error: None,
            fetched_at: self.fetched_at,
        }
    }

    pub fn to_resolved(&self, value: ErasedValue, fetched_at: Instant) -> Self {
        Self {
            key: self.key.clone(),
            status: EntryStatus::Resolved,
            value: Some(value),
            error: None,
            fetched_at: Some(fetched_at),
        }
    }

    /// Failure keeps the last resolved value (stale-on-error)
    pub fn to_failed(&self, error: ErrorInfo) -> Self {
        Self {
            key: self.key.clone(),
            status: EntryStatus::Failed,
            value: self.value.clone(),
            error: Some(error),
            fetched_at: self.fetched_at,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn status(&self) -> EntryStatus {
        self.status
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        self.error.as_ref()
    }

    pub fn fetched_at(&self) -> Option<Instant> {
        self.fetched_at
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.status == EntryStatus::Loading
    }

    /// Whether a resolved value may be served without calling the producer
    ///
    /// `ttl = None` means resolved values never go stale.
    pub fn is_fresh(&self, ttl: Option<Duration>) -> bool {
        if self.status != EntryStatus::Resolved {
            return false;
        }

        match (ttl, self.fetched_at) {
            (None, _) => true,
            (Some(ttl), Some(fetched_at)) => fetched_at.elapsed() < ttl,
            (Some(_), None) => false,
        }
    }

    /// Typed view of the cached value
    pub fn value<T: Send + Sync + 'static>(&self) -> Result<Option<Arc<T>>, ErrorInfo> {
        match &self.value {
            None => Ok(None),
            Some(value) => downcast(&self.key, value.clone()).map(Some),
        }
    }

    /// The `{ data, loading, error }` view of this snapshot
    pub fn state<T: Send + Sync + 'static>(&self) -> FetchState<T> {
        let loading = self.is_loading();

        match self.value::<T>() {
            Ok(data) => FetchState {
                data,
                loading,
                error: self.error.clone(),
            },
            Err(mismatch) => FetchState {
                data: None,
                loading,
                error: Some(mismatch),
            },
        }
    }
}

impl std::fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheEntry")
            .field("key", &self.key)
            .field("status", &self.status)
            .field("has_value", &self.value.is_some())
            .field("error", &self.error)
            .field("fetched_at", &self.fetched_at)
            .finish()
    }
}

/// Recovers the concrete type of an erased value stored under `key`
pub fn downcast<T: Send + Sync + 'static>(key: &str, value: ErasedValue) -> Result<Arc<T>, ErrorInfo> {
    value.downcast::<T>().map_err(|_| {
        ErrorInfo::new(format!(
            "Cached value for '{}' is not a {}",
            key,
            std::any::type_name::<T>()
        ))
    })
}

/// What a page sees for one key
#[derive(Debug)]
pub struct FetchState<T> {
    pub data: Option<Arc<T>>,
    pub loading: bool,
    pub error: Option<ErrorInfo>,
}

impl<T> FetchState<T> {
    pub fn is_settled(&self) -> bool {
        !self.loading
    }
}

impl<T> Clone for FetchState<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            loading: self.loading,
            error: self.error.clone(),
        }
    }
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}
