use std::marker::PhantomData;

use tokio::sync::watch;

use crate::domain::{CacheEntry, FetchState};

/// A subscriber's live view of one cache key
///
/// Dropping a subscription never cancels the underlying request.
pub struct Subscription<T> {
    receiver: watch::Receiver<CacheEntry>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> Subscription<T> {
    pub(crate) fn new(receiver: watch::Receiver<CacheEntry>) -> Self {
        Self {
            receiver,
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> String {
        self.receiver.borrow().key().to_string()
    }

    /// Current `{ data, loading, error }`, without waiting
    pub fn state(&self) -> FetchState<T> {
        self.receiver.borrow().state()
    }

    /// Current raw snapshot
    pub fn entry(&self) -> CacheEntry {
        self.receiver.borrow().clone()
    }

    /// Waits for the next snapshot change
    pub async fn changed(&mut self) -> FetchState<T> {
        // An error means the cache is gone; the last snapshot stays valid
        let _ = self.receiver.changed().await;
        self.state()
    }

    /// Waits until the key is no longer loading
    pub async fn settled(&mut self) -> FetchState<T> {
        let settled = self
            .receiver
            .wait_for(|entry| !entry.is_loading())
            .await
            .map(|entry| entry.state::<T>())
            .ok();

        settled.unwrap_or_else(|| self.state())
    }
}

impl<T> Clone for Subscription<T> {
    fn clone(&self) -> Self {
        Self {
            receiver: self.receiver.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("entry", &*self.receiver.borrow())
            .finish()
    }
}
