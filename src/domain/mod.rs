//! Domain layer - site content entities, cache state and errors

pub mod cache;
pub mod contact;
pub mod error;
pub mod event;
pub mod menu;
pub mod opening_hours;
pub mod special;
pub mod story;

pub use cache::{downcast, keys, CacheEntry, CacheKeyParams, EntryStatus, ErasedValue, FetchState};
pub use contact::{ContactMessage, ContactReason, ContactResponse};
pub use error::{ApiError, ErrorInfo};
pub use event::Event;
pub use menu::{MenuCategory, MenuItem, MenuItemRequest};
pub use opening_hours::{DayOfWeek, OpeningHours, OpeningHoursUpdate};
pub use special::Special;
pub use story::{GalleryImage, Story};
