//! Usage data types produced by a provider fetch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single rate-limit meter (e.g., "Current session", "All models")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageMetric {
    /// Label (e.g., "Current session", "Sonnet only")
    pub label: String,
    /// Percentage used (0-100)
    pub percent_used: f64,
    /// Reset descriptor (e.g., "Resets in 2h 5m")
    pub reset_info: String,
}

impl UsageMetric {
    /// Placeholder for a meter the provider did not report
    pub fn no_data(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            percent_used: 0.0,
            reset_info: "No data".to_string(),
        }
    }
}

/// Extra usage / credits meter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraUsage {
    /// Dollars spent (or credit balance, depending on provider)
    pub dollars_spent: f64,
    /// Percentage of the monthly limit used (0-100)
    pub percent_used: f64,
    /// Reset descriptor (e.g., "Monthly")
    pub reset_date: String,
    /// Whether extra usage is enabled for the account
    pub enabled: bool,
}

impl Default for ExtraUsage {
    fn default() -> Self {
        Self {
            dollars_spent: 0.0,
            percent_used: 0.0,
            reset_date: "---".to_string(),
            enabled: false,
        }
    }
}

/// Usage of one provider at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    /// Rolling session window (e.g., 5 hours)
    pub session: UsageMetric,
    /// Weekly window across all models
    pub weekly_all: UsageMetric,
    /// Weekly window for a specific model (e.g., Sonnet)
    pub weekly_model: UsageMetric,
    /// Extra usage / credits
    #[serde(default)]
    pub extra: ExtraUsage,
    /// When this snapshot was fetched
    #[serde(default = "Utc::now")]
    pub fetched_at: DateTime<Utc>,
}

/// The fixed set of metrics tracked for every provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Session,
    WeeklyAll,
    WeeklyModel,
    Extra,
}

impl MetricKind {
    /// All metrics, in evaluation order
    pub const ALL: [MetricKind; 4] = [
        MetricKind::Session,
        MetricKind::WeeklyAll,
        MetricKind::WeeklyModel,
        MetricKind::Extra,
    ];

    /// Metric name used in notification keys
    pub fn name(self) -> &'static str {
        match self {
            MetricKind::Session => "session",
            MetricKind::WeeklyAll => "weekly_all",
            MetricKind::WeeklyModel => "weekly_model",
            MetricKind::Extra => "extra",
        }
    }

    /// Key identifying this metric of `provider` (e.g., `Claude_session`)
    pub fn key(self, provider: &str) -> String {
        format!("{}_{}", provider, self.name())
    }
}

/// A flattened view of one metric, as consumed by the crossing tracker
#[derive(Debug, Clone, PartialEq)]
pub struct MetricReading {
    pub kind: MetricKind,
    /// Label used in notification titles
    pub label: String,
    pub percent: f64,
    /// Reset descriptor used as notification body
    pub reset_info: String,
}

impl UsageSnapshot {
    /// Flatten the four metrics for `provider`
    ///
    /// Session, weekly and extra labels are prefixed with the provider name;
    /// the model-specific metric keeps its own label.
    pub fn readings(&self, provider: &str) -> [MetricReading; 4] {
        [
            MetricReading {
                kind: MetricKind::Session,
                label: format!("{} session", provider),
                percent: self.session.percent_used,
                reset_info: self.session.reset_info.clone(),
            },
            MetricReading {
                kind: MetricKind::WeeklyAll,
                label: format!("{} weekly", provider),
                percent: self.weekly_all.percent_used,
                reset_info: self.weekly_all.reset_info.clone(),
            },
            MetricReading {
                kind: MetricKind::WeeklyModel,
                label: self.weekly_model.label.clone(),
                percent: self.weekly_model.percent_used,
                reset_info: self.weekly_model.reset_info.clone(),
            },
            MetricReading {
                kind: MetricKind::Extra,
                label: format!("{} extra usage", provider),
                percent: self.extra.percent_used,
                reset_info: self.extra.reset_date.clone(),
            },
        ]
    }
}
