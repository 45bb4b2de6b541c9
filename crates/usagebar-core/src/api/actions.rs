//! Action methods on [`UsageCore`].
//!
//! These wire the core services into the long-running pieces (scheduler,
//! poller, menu controller) and perform startup side-effects.

use tokio::task::JoinHandle;
use tracing::info;

use crate::autostart::{apply_autostart, Autostart};
use crate::menu::MenuController;
use crate::monitor::{RefreshScheduler, UsagePoller};
use crate::notifications::Notifier;
use crate::usage::UsageSource;

use super::core::UsageCore;

impl UsageCore {
    /// Spawn the refresh scheduler loop
    pub fn start_scheduler(&self) -> JoinHandle<()> {
        info!(
            interval_secs = self.settings().refresh_interval_secs,
            "Starting refresh scheduler"
        );
        RefreshScheduler::new(self.settings_store().clone(), self.event_sender()).start()
    }

    /// Build a poller sharing this core's settings, tracker, cache and events
    pub fn poller<S, N>(&self, sources: Vec<S>, notifier: N) -> UsagePoller<S, N>
    where
        S: UsageSource + 'static,
        N: Notifier + 'static,
    {
        UsagePoller::new(
            sources,
            notifier,
            self.settings_store().clone(),
            self.tracker().clone(),
            self.cache().clone(),
        )
        .with_event_tx(self.event_sender())
    }

    /// Build the tray menu controller from the current settings
    pub fn menu_controller<A: Autostart>(&self, autostart: A) -> MenuController<A> {
        MenuController::new(self.settings_store().clone(), autostart, self.event_sender())
    }

    /// Push the persisted "start at login" preference into the OS registration
    ///
    /// Failures are logged and absorbed. Returns whether registration
    /// succeeded.
    pub fn sync_autostart<A: Autostart + ?Sized>(&self, autostart: &A) -> bool {
        let enabled = self.settings().start_at_login;
        info!(enabled, "Syncing start-at-login registration");
        apply_autostart(autostart, enabled)
    }
}
