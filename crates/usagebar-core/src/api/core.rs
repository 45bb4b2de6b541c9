//! UsageCore: the Facade entry-point for the tray/panel shell.
//!
//! This struct owns every shared service and exposes high-level methods.
//! Consumers never need to wire the store, tracker, cache and event channel
//! together themselves.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::config::SettingsStore;
use crate::notifications::CrossingTracker;
use crate::usage::SharedUsageCache;

use super::events::{CoreEvent, EventSender};

/// Default broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// The Facade that wraps all usagebar-core services.
///
/// Constructed via [`UsageCoreBuilder`](super::builder::UsageCoreBuilder).
pub struct UsageCore {
    /// Persisted user preferences
    settings: Arc<SettingsStore>,
    /// Per-metric crossing state, shared with the poller
    tracker: Arc<CrossingTracker>,
    /// Last successful snapshot per provider
    cache: SharedUsageCache,
    /// Broadcast sender for core events
    event_tx: EventSender,
}

impl UsageCore {
    /// Create a new UsageCore instance (prefer `UsageCoreBuilder`)
    pub(crate) fn new(
        settings: Arc<SettingsStore>,
        tracker: Arc<CrossingTracker>,
        cache: SharedUsageCache,
    ) -> Self {
        let (event_tx, _) = broadcast::channel::<CoreEvent>(EVENT_CHANNEL_CAPACITY);
        Self {
            settings,
            tracker,
            cache,
            event_tx,
        }
    }

    /// Shared settings store
    pub fn settings_store(&self) -> &Arc<SettingsStore> {
        &self.settings
    }

    /// Get a clone of the broadcast event sender.
    pub(crate) fn event_sender(&self) -> EventSender {
        self.event_tx.clone()
    }

    // =========================================================
    // Internal accessors for query/action impls
    // =========================================================

    pub(crate) fn tracker(&self) -> &Arc<CrossingTracker> {
        &self.tracker
    }

    pub(crate) fn cache(&self) -> &SharedUsageCache {
        &self.cache
    }
}
