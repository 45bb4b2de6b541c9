//! Adaptive refresh scheduler.
//!
//! Sleeps for the configured refresh interval, then emits
//! [`CoreEvent::RefreshRequested`], forever. The interval is read from the
//! settings store at the top of every iteration, so a change takes effect
//! once the sleep in progress completes.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::api::{CoreEvent, EventSender};
use crate::config::SettingsStore;

/// Background loop emitting periodic refresh signals
pub struct RefreshScheduler {
    settings: Arc<SettingsStore>,
    event_tx: EventSender,
}

impl RefreshScheduler {
    /// Create a scheduler reading its interval from `settings`
    pub fn new(settings: Arc<SettingsStore>, event_tx: EventSender) -> Self {
        Self { settings, event_tx }
    }

    /// Start the loop in a background task
    ///
    /// There is no cancellation other than aborting the returned handle.
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    /// Run the scheduling loop
    async fn run(self) {
        loop {
            let secs = self.settings.get().refresh_interval_secs;
            debug!(secs, "Next refresh scheduled");

            tokio::time::sleep(Duration::from_secs(secs)).await;

            // No subscribers is not an error: the tick is simply dropped
            let _ = self.event_tx.send(CoreEvent::RefreshRequested);
        }
    }
}
