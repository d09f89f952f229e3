use std::time::Duration;

/// Cache-wide freshness and retry policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePolicy {
    /// How long a resolved value is served without refetching; `None` = forever
    pub ttl: Option<Duration>,
    /// Whether a new subscription to a failed key runs the producer again
    pub retry_on_subscribe: bool,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            ttl: None,
            retry_on_subscribe: true,
        }
    }
}

impl CachePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn with_retry_on_subscribe(mut self, retry: bool) -> Self {
        self.retry_on_subscribe = retry;
        self
    }
}

/// Per-call overrides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Freshness window for this call, replacing the policy's
    pub ttl: Option<Duration>,
}

impl FetchOptions {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }
}
