//! Cache infrastructure - request cache and subscriptions

mod policy;
mod request_cache;
mod subscription;

pub use policy::{CachePolicy, FetchOptions};
pub use request_cache::{Listener, ListenerId, RequestCache};
pub use subscription::Subscription;
