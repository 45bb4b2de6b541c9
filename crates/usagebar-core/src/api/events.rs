//! Core event system for push-based change notification.
//!
//! The scheduler and the "Refresh Now" action both emit
//! [`CoreEvent::RefreshRequested`]; the usage poller reacts to it and reports
//! back with `UsageUpdated` / `UsageFetchFailed`. Menu handling emits
//! `SettingsChanged` and `RefreshIntervalChanged` for countdown displays.

use tokio::sync::broadcast;

use crate::config::Settings;

use super::core::UsageCore;

/// Sender half of the core event channel
pub type EventSender = broadcast::Sender<CoreEvent>;

/// Events emitted by the core when state changes occur.
///
/// Consumers call [`UsageCore::subscribe()`] to receive these events
/// via a `broadcast::Receiver`.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreEvent {
    /// Usage should be fetched now (scheduled tick or manual refresh)
    RefreshRequested,

    /// The refresh interval was changed from the menu
    RefreshIntervalChanged {
        /// New interval in seconds
        secs: u64,
    },

    /// Settings were committed
    SettingsChanged(Settings),

    /// A provider fetch succeeded and the cache was updated
    UsageUpdated {
        /// Provider name
        provider: String,
    },

    /// A provider fetch failed (not retried)
    UsageFetchFailed {
        /// Provider name
        provider: String,
        /// Error description
        error: String,
    },

    /// A threshold notification was handed to the notifier
    NotificationFired {
        /// Metric key
        key: String,
        /// Notification title
        title: String,
    },
}

impl UsageCore {
    /// Subscribe to core events.
    ///
    /// Returns a broadcast receiver that will receive [`CoreEvent`]s.
    /// If the receiver falls behind, older events are dropped (lagged).
    pub fn subscribe(&self) -> broadcast::Receiver<CoreEvent> {
        self.event_sender().subscribe()
    }

    /// Request an immediate refresh ("Refresh Now").
    ///
    /// Does not disturb the scheduler's own sleep. Ignored if nobody listens.
    pub fn request_refresh(&self) {
        let _ = self.event_sender().send(CoreEvent::RefreshRequested);
    }
}
