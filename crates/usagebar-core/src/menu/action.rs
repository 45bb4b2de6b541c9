//! Menu action identifiers.
//!
//! Identifiers are the stable contract between tray clicks and the handler.
//! They are decoded into a [`MenuAction`] once, at the boundary.

use std::fmt;

use crate::config::{is_valid_interval, is_valid_threshold, ThresholdChoice, THRESHOLD_OFF};

pub const SHOW_HIDE_ID: &str = "show_hide";
pub const REFRESH_NOW_ID: &str = "refresh_now";
pub const START_LOGIN_ID: &str = "start_login";
pub const QUIT_ID: &str = "quit";
pub const INTERVAL_PREFIX: &str = "interval_";
pub const NOTIFY_PREFIX: &str = "notify_";

/// Action decoded from a menu click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Toggle the floating panel
    ShowHide,
    /// Fetch usage immediately
    RefreshNow,
    /// Exit the application
    Quit,
    /// Select a refresh interval (seconds)
    SelectInterval(u64),
    /// Select a notification threshold or "off"
    SelectThreshold(ThresholdChoice),
    /// Flip "Start at Login"
    ToggleAutostart,
}

impl MenuAction {
    /// Decode a click identifier
    ///
    /// Returns `None` for unknown identifiers and for interval/threshold
    /// values outside the offered choices.
    pub fn parse(id: &str) -> Option<Self> {
        match id {
            SHOW_HIDE_ID => Some(MenuAction::ShowHide),
            REFRESH_NOW_ID => Some(MenuAction::RefreshNow),
            START_LOGIN_ID => Some(MenuAction::ToggleAutostart),
            QUIT_ID => Some(MenuAction::Quit),
            _ => {
                if let Some(secs) = id.strip_prefix(INTERVAL_PREFIX) {
                    let secs = secs.parse::<u64>().ok()?;
                    return is_valid_interval(secs).then_some(MenuAction::SelectInterval(secs));
                }
                if let Some(pct) = id.strip_prefix(NOTIFY_PREFIX) {
                    let pct = pct.parse::<u32>().ok()?;
                    let valid = pct == THRESHOLD_OFF || is_valid_threshold(pct);
                    return valid
                        .then(|| MenuAction::SelectThreshold(ThresholdChoice::from_raw(pct)));
                }
                None
            }
        }
    }

    /// Identifier of the menu item that produces this action
    pub fn id(&self) -> String {
        match self {
            MenuAction::ShowHide => SHOW_HIDE_ID.to_string(),
            MenuAction::RefreshNow => REFRESH_NOW_ID.to_string(),
            MenuAction::Quit => QUIT_ID.to_string(),
            MenuAction::ToggleAutostart => START_LOGIN_ID.to_string(),
            MenuAction::SelectInterval(secs) => interval_id(*secs),
            MenuAction::SelectThreshold(choice) => notify_id(choice.raw()),
        }
    }
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

/// Identifier of an interval radio item
pub fn interval_id(secs: u64) -> String {
    format!("{}{}", INTERVAL_PREFIX, secs)
}

/// Identifier of a threshold radio item (0 = off)
pub fn notify_id(pct: u32) -> String {
    format!("{}{}", NOTIFY_PREFIX, pct)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NOTIFY_THRESHOLDS, REFRESH_INTERVALS};

    #[test]
    fn test_parse_fixed_ids() {
        assert_eq!(MenuAction::parse("show_hide"), Some(MenuAction::ShowHide));
        assert_eq!(MenuAction::parse("refresh_now"), Some(MenuAction::RefreshNow));
        assert_eq!(MenuAction::parse("start_login"), Some(MenuAction::ToggleAutostart));
        assert_eq!(MenuAction::parse("quit"), Some(MenuAction::Quit));
    }

    #[test]
    fn test_parse_radio_ids() {
        assert_eq!(
            MenuAction::parse("interval_600"),
            Some(MenuAction::SelectInterval(600))
        );
        assert_eq!(
            MenuAction::parse("notify_95"),
            Some(MenuAction::SelectThreshold(ThresholdChoice::Percent(95)))
        );
        assert_eq!(
            MenuAction::parse("notify_0"),
            Some(MenuAction::SelectThreshold(ThresholdChoice::Off))
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(MenuAction::parse(""), None);
        assert_eq!(MenuAction::parse("interval_"), None);
        assert_eq!(MenuAction::parse("interval_61"), None);
        assert_eq!(MenuAction::parse("interval_abc"), None);
        assert_eq!(MenuAction::parse("notify_50"), None);
        assert_eq!(MenuAction::parse("notify_-1"), None);
        assert_eq!(MenuAction::parse("Quit"), None);
    }

    #[test]
    fn test_every_menu_id_decodes_back() {
        for (secs, _) in REFRESH_INTERVALS {
            let id = interval_id(secs);
            assert_eq!(MenuAction::parse(&id).map(|a| a.id()), Some(id));
        }
        for (pct, _) in NOTIFY_THRESHOLDS {
            let id = notify_id(pct);
            assert_eq!(MenuAction::parse(&id).map(|a| a.id()), Some(id));
        }
    }
}
