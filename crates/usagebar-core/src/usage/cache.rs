//! Last successful snapshot per provider.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::types::UsageSnapshot;

/// Shared cache type alias
pub type SharedUsageCache = Arc<UsageCache>;

/// Most recent successful fetch for each provider
#[derive(Debug, Default)]
pub struct UsageCache {
    snapshots: RwLock<HashMap<String, UsageSnapshot>>,
}

impl UsageCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache wrapped in an Arc
    pub fn shared() -> SharedUsageCache {
        Arc::new(Self::new())
    }

    /// Replace the cached snapshot of `provider`
    pub fn store(&self, provider: &str, snapshot: UsageSnapshot) {
        self.snapshots.write().insert(provider.to_string(), snapshot);
    }

    /// Cached snapshot of `provider`, if any fetch has succeeded yet
    pub fn get(&self, provider: &str) -> Option<UsageSnapshot> {
        self.snapshots.read().get(provider).cloned()
    }
}
