//! Usage providers.
//!
//! A provider is anything that can produce a [`UsageSnapshot`] on demand.
//! HTTP clients live outside this crate; [`CommandSource`] lets an external
//! program stand in for one.

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use super::format::{format_reset_after, format_reset_at, window_label};
use super::types::{ExtraUsage, UsageMetric, UsageSnapshot};

/// Default timeout for a single command-backed fetch
const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for usage providers (Claude, Codex, ...)
pub trait UsageSource: Send + Sync {
    /// Provider name used in metric keys and notification labels (e.g., "Claude")
    fn name(&self) -> &str;

    /// Short tag used in the tray title (e.g., "C")
    fn tag(&self) -> &str;

    /// Fetch the current usage
    fn fetch(&self) -> impl Future<Output = Result<UsageSnapshot>> + Send;
}

/// One meter as printed by a usage command
///
/// The reset descriptor is either given verbatim (`reset_info`) or derived
/// from `resets_at` (RFC 3339) or `resets_in_secs`. A missing label falls
/// back to the window length, then to the meter's default name.
#[derive(Debug, Deserialize)]
struct CommandMetric {
    label: Option<String>,
    percent_used: f64,
    reset_info: Option<String>,
    resets_at: Option<String>,
    resets_in_secs: Option<i64>,
    window_secs: Option<i64>,
}

impl CommandMetric {
    fn into_metric(self, default_label: &str, now: DateTime<Utc>) -> UsageMetric {
        let label = match (self.label, self.window_secs) {
            (Some(label), _) => label,
            (None, Some(secs)) => window_label(secs),
            (None, None) => default_label.to_string(),
        };
        let reset_info = match (self.reset_info, self.resets_in_secs) {
            (Some(info), _) => info,
            (None, Some(secs)) => format_reset_after(secs),
            (None, None) => format_reset_at(self.resets_at.as_deref(), now),
        };

        UsageMetric {
            label,
            percent_used: self.percent_used,
            reset_info,
        }
    }
}

/// Snapshot as printed by a usage command
#[derive(Debug, Deserialize)]
struct CommandOutput {
    session: CommandMetric,
    weekly_all: CommandMetric,
    weekly_model: CommandMetric,
    #[serde(default)]
    extra: ExtraUsage,
}

impl CommandOutput {
    fn into_snapshot(self, now: DateTime<Utc>) -> UsageSnapshot {
        UsageSnapshot {
            session: self.session.into_metric("Current session", now),
            weekly_all: self.weekly_all.into_metric("All models", now),
            weekly_model: self.weekly_model.into_metric("Model weekly", now),
            extra: self.extra,
            fetched_at: now,
        }
    }
}

/// Provider backed by an external command that prints a snapshot as JSON
pub struct CommandSource {
    name: String,
    tag: String,
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandSource {
    /// Create a source running `command` (split on whitespace) for `name`
    ///
    /// The tag defaults to the first character of the name.
    pub fn new(name: impl Into<String>, command: &str) -> Result<Self> {
        let name = name.into();
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .with_context(|| format!("Empty command for provider {}", name))?;
        let tag = name.chars().next().map(String::from).unwrap_or_default();

        Ok(Self {
            name,
            tag,
            program,
            args: parts.collect(),
            timeout: DEFAULT_FETCH_TIMEOUT,
        })
    }

    /// Override the tray title tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Override the fetch timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl UsageSource for CommandSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn tag(&self) -> &str {
        &self.tag
    }

    async fn fetch(&self) -> Result<UsageSnapshot> {
        debug!(provider = %self.name, program = %self.program, "Running usage command");

        let child = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to spawn usage command: {}", self.program))?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .with_context(|| {
                format!(
                    "Usage command for {} timed out after {}s",
                    self.name,
                    self.timeout.as_secs()
                )
            })?
            .context("Failed to wait for usage command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "Usage command for {} exited with {}: {}",
                self.name,
                output.status,
                stderr.trim()
            );
        }

        let parsed: CommandOutput = serde_json::from_slice(&output.stdout)
            .with_context(|| format!("Failed to parse usage output for {}", self.name))?;
        Ok(parsed.into_snapshot(Utc::now()))
    }
}
