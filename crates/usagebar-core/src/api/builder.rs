//! Builder for constructing a [`UsageCore`] instance.
//!
//! ```ignore
//! let core = UsageCoreBuilder::new(&data_dir)
//!     .with_cache(cache)
//!     .build();
//! ```

use std::path::Path;
use std::sync::Arc;

use crate::config::SettingsStore;
use crate::notifications::CrossingTracker;
use crate::usage::{SharedUsageCache, UsageCache};

use super::core::UsageCore;

/// Builder for constructing a [`UsageCore`] Facade instance
pub struct UsageCoreBuilder {
    settings: Arc<SettingsStore>,
    cache: Option<SharedUsageCache>,
}

impl UsageCoreBuilder {
    /// Create a new builder whose settings live in `data_dir`
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self::from_store(Arc::new(SettingsStore::open(data_dir)))
    }

    /// Create a new builder from an already-shared settings store
    pub fn from_store(settings: Arc<SettingsStore>) -> Self {
        Self {
            settings,
            cache: None,
        }
    }

    /// Use an existing usage cache instead of creating a new one
    pub fn with_cache(mut self, cache: SharedUsageCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Build the `UsageCore` instance
    ///
    /// The crossing tracker always starts empty: every metric is unarmed at
    /// launch.
    pub fn build(self) -> UsageCore {
        let cache = self.cache.unwrap_or_else(UsageCache::shared);

        UsageCore::new(self.settings, Arc::new(CrossingTracker::new()), cache)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let core = UsageCoreBuilder::new(dir.path()).build();

        assert_eq!(core.settings().refresh_interval_secs, 300);
        assert_eq!(
            core.settings_store().path(),
            dir.path().join("settings.json")
        );
    }

    #[test]
    fn test_builder_from_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(SettingsStore::open(dir.path()));
        let store_clone = store.clone();

        let core = UsageCoreBuilder::from_store(store).build();
        assert!(Arc::ptr_eq(core.settings_store(), &store_clone));
    }

    #[test]
    fn test_builder_with_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = UsageCache::shared();
        let core = UsageCoreBuilder::new(dir.path())
            .with_cache(cache.clone())
            .build();

        assert!(Arc::ptr_eq(core.cache(), &cache));
    }
}
