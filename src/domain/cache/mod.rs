//! Cache domain - entry snapshots, fetch state and key construction

mod entry;
mod key;

pub use entry::{downcast, CacheEntry, EntryStatus, ErasedValue, FetchState};
pub use key::{keys, CacheKeyParams};
