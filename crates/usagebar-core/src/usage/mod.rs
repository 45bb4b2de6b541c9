//! Usage monitoring: provider snapshots, formatting and caching.
//!
//! Providers implement [`UsageSource`]; the monitor keeps the latest
//! successful snapshot of each in a [`UsageCache`].

pub mod cache;
pub mod format;
pub mod source;
pub mod types;

pub use cache::{SharedUsageCache, UsageCache};
pub use format::{format_reset_after, format_reset_at, format_tray_title, window_label};
pub use source::{CommandSource, UsageSource};
pub use types::{ExtraUsage, MetricKind, MetricReading, UsageMetric, UsageSnapshot};
