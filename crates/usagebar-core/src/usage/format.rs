//! Human-readable strings derived from usage data.

use chrono::{DateTime, Utc};

use super::types::UsageSnapshot;

/// Describe when a window resets, given an RFC 3339 timestamp
///
/// Unparseable timestamps are returned verbatim; a missing one becomes `---`.
pub fn format_reset_at(resets_at: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(raw) = resets_at else {
        return "---".to_string();
    };

    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => {
            let diff = parsed.signed_duration_since(now);
            let hours = diff.num_hours();
            let mins = diff.num_minutes() % 60;
            if hours > 0 {
                format!("Resets in {}h {}m", hours, mins)
            } else if mins > 0 {
                format!("Resets in {}m", mins)
            } else {
                "Resets soon".to_string()
            }
        }
        Err(_) => raw.to_string(),
    }
}

/// Describe when a window resets, given the remaining seconds
pub fn format_reset_after(secs: i64) -> String {
    if secs <= 0 {
        return "Resets soon".to_string();
    }
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    if hours > 0 {
        format!("Resets in {}h {}m", hours, mins)
    } else {
        format!("Resets in {}m", mins)
    }
}

/// Label for a rate-limit window of the given length
pub fn window_label(window_secs: i64) -> String {
    let hours = window_secs / 3600;
    if hours >= 24 {
        format!("{}-day window", hours / 24)
    } else {
        format!("{}-hour window", hours)
    }
}

/// Tray title summarizing session/weekly usage per provider
///
/// Each entry is `(tag, snapshot)`; providers without data are skipped.
pub fn format_tray_title<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (&'a str, Option<&'a UsageSnapshot>)>,
{
    let parts: Vec<String> = entries
        .into_iter()
        .filter_map(|(tag, snapshot)| {
            snapshot.map(|s| {
                format!(
                    "{}:{}/{}%",
                    tag,
                    s.session.percent_used.round() as i64,
                    s.weekly_all.percent_used.round() as i64
                )
            })
        })
        .collect();

    if parts.is_empty() {
        "Usage: --%".to_string()
    } else {
        parts.join("  ")
    }
}
