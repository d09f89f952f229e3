//! Cache key construction

use std::collections::BTreeMap;

/// Well-known keys used by the site's pages
pub mod keys {
    pub const OPENING_HOURS: &str = "opening-hours";
    pub const MENU_ITEMS: &str = "menu-items";
    pub const MENU_CATEGORIES: &str = "menu-categories";
    pub const EVENTS: &str = "events";
    pub const ACTIVE_EVENTS_HOME: &str = "active-events-home";
    pub const UPCOMING_EVENTS: &str = "upcoming-events";
    pub const SPECIALS: &str = "specials";
    pub const ACTIVE_SPECIALS: &str = "active-specials";
    pub const STORIES: &str = "stories";
    pub const GALLERY: &str = "gallery";
}

/// Parameters for building a cache key
///
/// Produces `primary[:name=value...]` with components sorted by name, so the
/// same logical request always maps to the same key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheKeyParams {
    /// Primary identifier (e.g. "menu-items")
    pub primary: String,
    /// Secondary components (sorted for consistency)
    pub components: BTreeMap<String, String>,
}

impl CacheKeyParams {
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            components: BTreeMap::new(),
        }
    }

    pub fn with_component(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.components.insert(key.into(), value.to_string());
        self
    }

    /// Builds the opaque key string
    pub fn generate(&self) -> String {
        let mut parts = vec![self.primary.clone()];

        for (k, v) in &self.components {
            parts.push(format!("{}={}", k, v));
        }

        parts.join(":")
    }
}

impl From<CacheKeyParams> for String {
    fn from(params: CacheKeyParams) -> Self {
        params.generate()
    }
}

impl std::fmt::Display for CacheKeyParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.generate())
    }
}
