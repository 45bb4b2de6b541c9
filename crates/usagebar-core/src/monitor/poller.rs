//! Fetch orchestration: one refresh cycle over every usage source.
//!
//! The poller waits for [`CoreEvent::RefreshRequested`], fetches each source
//! in turn, caches successful snapshots, and runs them through the crossing
//! tracker under a single settings snapshot per cycle.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::{CoreEvent, EventSender};
use crate::config::SettingsStore;
use crate::notifications::{dispatch, CrossingTracker, Notifier, NotifyPolicy};
use crate::usage::{SharedUsageCache, UsageSource};

/// Summary of one refresh cycle
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CycleReport {
    /// Providers fetched successfully
    pub updated: Vec<String>,
    /// Providers whose fetch failed
    pub failed: Vec<String>,
    /// Notifications handed to the notifier
    pub notified: usize,
}

/// Poller driving usage sources on refresh signals
pub struct UsagePoller<S, N> {
    sources: Vec<S>,
    notifier: N,
    settings: Arc<SettingsStore>,
    tracker: Arc<CrossingTracker>,
    cache: SharedUsageCache,
    /// Core event sender for fetch results and fired notifications
    event_tx: Option<EventSender>,
    /// Run a cycle immediately on start, before the first signal
    fetch_on_start: bool,
}

impl<S, N> UsagePoller<S, N>
where
    S: UsageSource + 'static,
    N: Notifier + 'static,
{
    /// Create a new poller
    pub fn new(
        sources: Vec<S>,
        notifier: N,
        settings: Arc<SettingsStore>,
        tracker: Arc<CrossingTracker>,
        cache: SharedUsageCache,
    ) -> Self {
        Self {
            sources,
            notifier,
            settings,
            tracker,
            cache,
            event_tx: None,
            fetch_on_start: true,
        }
    }

    /// Set the core event sender for fetch/notification events
    pub fn with_event_tx(mut self, tx: EventSender) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// Whether to run a cycle as soon as the poller starts (default: true)
    pub fn fetch_on_start(mut self, enabled: bool) -> Self {
        self.fetch_on_start = enabled;
        self
    }

    /// Start polling in a background task, driven by `rx`
    pub fn start(self, rx: broadcast::Receiver<CoreEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run(rx).await;
        })
    }

    /// Run the polling loop until the event channel closes
    async fn run(self, mut rx: broadcast::Receiver<CoreEvent>) {
        if self.fetch_on_start {
            self.poll_once().await;
        }

        loop {
            match rx.recv().await {
                Ok(CoreEvent::RefreshRequested) => {
                    self.poll_once().await;
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    // Some signals were dropped; one catch-up cycle covers them
                    debug!(skipped, "Refresh signals lagged");
                    self.poll_once().await;
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    /// Perform one refresh cycle over all sources
    ///
    /// Threshold and enabled flag are read once, before any fetch, so every
    /// metric in the cycle is judged against the same values.
    pub async fn poll_once(&self) -> CycleReport {
        let policy = NotifyPolicy::from(&self.settings.get());
        let mut report = CycleReport::default();

        for source in &self.sources {
            let provider = source.name().to_string();

            match source.fetch().await {
                Ok(snapshot) => {
                    let notifications = self.tracker.evaluate(&provider, &snapshot, policy);
                    self.cache.store(&provider, snapshot);

                    dispatch(&self.notifier, &notifications);
                    for n in &notifications {
                        info!(key = %n.key, title = %n.title, "Threshold notification");
                        self.emit(CoreEvent::NotificationFired {
                            key: n.key.clone(),
                            title: n.title.clone(),
                        });
                    }

                    report.notified += notifications.len();
                    self.emit(CoreEvent::UsageUpdated {
                        provider: provider.clone(),
                    });
                    report.updated.push(provider);
                }
                Err(e) => {
                    warn!(%provider, error = %e, "Usage fetch failed");
                    self.emit(CoreEvent::UsageFetchFailed {
                        provider: provider.clone(),
                        error: e.to_string(),
                    });
                    report.failed.push(provider);
                }
            }
        }

        report
    }

    fn emit(&self, event: CoreEvent) {
        if let Some(ref tx) = self.event_tx {
            let _ = tx.send(event);
        }
    }
}
