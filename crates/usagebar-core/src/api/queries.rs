//! Read-only query methods on [`UsageCore`].
//!
//! Every method returns owned values; callers never hold a lock.

use std::time::Duration;

use crate::config::Settings;
use crate::usage::{format_tray_title, UsageSnapshot};

use super::core::UsageCore;
use super::types::ApiError;

impl UsageCore {
    /// Current settings (full snapshot)
    pub fn settings(&self) -> Settings {
        self.settings_store().get()
    }

    /// Current refresh interval
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.settings_store().get().refresh_interval_secs)
    }

    /// Last successfully fetched snapshot for a provider
    pub fn cached_usage(&self, provider: &str) -> Result<UsageSnapshot, ApiError> {
        self.cache().get(provider).ok_or_else(|| ApiError::NoData {
            provider: provider.to_string(),
        })
    }

    /// Tray title for the given `(provider, tag)` pairs, from cached data
    pub fn tray_title<'a, I>(&self, providers: I) -> String
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let snapshots: Vec<(&str, Option<UsageSnapshot>)> = providers
            .into_iter()
            .map(|(provider, tag)| (tag, self.cache().get(provider)))
            .collect();

        format_tray_title(snapshots.iter().map(|(tag, s)| (*tag, s.as_ref())))
    }

    /// Whether a metric key is currently armed (already notified)
    pub fn is_armed(&self, key: &str) -> bool {
        self.tracker().is_armed(key)
    }
}
