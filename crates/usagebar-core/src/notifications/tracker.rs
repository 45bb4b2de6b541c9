//! Edge-triggered threshold crossing detection.
//!
//! Each metric key carries an "armed" flag meaning a notification already
//! fired for the current above-threshold excursion. The flag is cleared only
//! when the metric drops back below the threshold.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::debug;

use crate::config::{Settings, THRESHOLD_OFF};
use crate::usage::UsageSnapshot;

/// Notification policy, read once per fetch cycle from settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifyPolicy {
    /// Threshold percentage (0 = off)
    pub threshold: u32,
    /// Whether notifications are enabled
    pub enabled: bool,
}

impl NotifyPolicy {
    /// Whether this policy can fire at all
    pub fn is_active(&self) -> bool {
        self.enabled && self.threshold != THRESHOLD_OFF
    }
}

impl From<&Settings> for NotifyPolicy {
    fn from(settings: &Settings) -> Self {
        Self {
            threshold: settings.notify_threshold,
            enabled: settings.notifications_enabled,
        }
    }
}

/// Outcome of evaluating one metric
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Crossed at or above the threshold: notify and arm
    Fire,
    /// Dropped below the threshold while armed: disarm silently
    Clear,
    /// Nothing to do
    Unchanged,
}

/// Decide what to do with one metric reading
///
/// With an inactive policy nothing changes, whatever the percent; armed
/// flags stay frozen until notifications are active again.
pub fn decide(percent: f64, policy: NotifyPolicy, armed: bool) -> Transition {
    if !policy.is_active() {
        return Transition::Unchanged;
    }

    let threshold = policy.threshold as f64;
    if percent >= threshold && !armed {
        Transition::Fire
    } else if percent < threshold && armed {
        Transition::Clear
    } else {
        Transition::Unchanged
    }
}

/// A notification the tracker decided to send
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// Metric key (e.g., `Claude_session`)
    pub key: String,
    /// Title, e.g. `Claude session at 82%`
    pub title: String,
    /// Body (the metric's reset descriptor)
    pub body: String,
}

/// Per-metric armed flags, mutated only through [`CrossingTracker::evaluate`]
#[derive(Debug, Default)]
pub struct CrossingTracker {
    armed: Mutex<HashMap<String, bool>>,
}

impl CrossingTracker {
    /// Create a tracker with no armed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate all metrics of one provider snapshot under a single policy
    ///
    /// Returns the notifications to send. The lock is released before
    /// returning, so dispatch never happens while holding it.
    pub fn evaluate(
        &self,
        provider: &str,
        snapshot: &UsageSnapshot,
        policy: NotifyPolicy,
    ) -> Vec<Notification> {
        if !policy.is_active() {
            return Vec::new();
        }

        let mut fired = Vec::new();
        let mut armed = self.armed.lock();

        for reading in snapshot.readings(provider) {
            let key = reading.kind.key(provider);
            let flag = armed.entry(key.clone()).or_insert(false);

            match decide(reading.percent, policy, *flag) {
                Transition::Fire => {
                    *flag = true;
                    debug!(%key, percent = reading.percent, "Threshold crossed");
                    fired.push(Notification {
                        title: format!("{} at {:.0}%", reading.label, reading.percent),
                        body: reading.reset_info,
                        key,
                    });
                }
                Transition::Clear => {
                    *flag = false;
                    debug!(%key, percent = reading.percent, "Dropped below threshold");
                }
                Transition::Unchanged => {}
            }
        }

        fired
    }

    /// Whether `key` is currently armed
    pub fn is_armed(&self, key: &str) -> bool {
        self.armed.lock().get(key).copied().unwrap_or(false)
    }

    /// Copy of all armed flags
    pub fn armed_snapshot(&self) -> HashMap<String, bool> {
        self.armed.lock().clone()
    }
}
