use serde::{Deserialize, Serialize};

/// Refresh interval choices offered in the tray menu, in seconds
pub const REFRESH_INTERVALS: [(u64, &str); 5] = [
    (60, "1 min"),
    (120, "2 min"),
    (300, "5 min"),
    (600, "10 min"),
    (900, "15 min"),
];

/// Notification threshold choices offered in the tray menu (0 = off)
pub const NOTIFY_THRESHOLDS: [(u32, &str); 5] =
    [(70, "70%"), (80, "80%"), (90, "90%"), (95, "95%"), (THRESHOLD_OFF, "Off")];

/// Threshold value that stands for "notifications off"
pub const THRESHOLD_OFF: u32 = 0;

/// User preferences persisted to `settings.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Refresh interval in seconds (60, 120, 300, 600, 900)
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    /// Notification threshold percentage (70, 80, 90, 95)
    ///
    /// Meaningless while `notifications_enabled` is false.
    #[serde(default = "default_notify_threshold")]
    pub notify_threshold: u32,

    /// Whether threshold notifications are enabled
    #[serde(default = "default_notifications_enabled")]
    pub notifications_enabled: bool,

    /// Whether the app is registered to start at login
    #[serde(default)]
    pub start_at_login: bool,
}

fn default_refresh_interval() -> u64 {
    300
}

fn default_notify_threshold() -> u32 {
    80
}

fn default_notifications_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval(),
            notify_threshold: default_notify_threshold(),
            notifications_enabled: default_notifications_enabled(),
            start_at_login: false,
        }
    }
}

/// Effective threshold choice, as shown by the "Notify At" radio group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdChoice {
    /// Notifications are off
    Off,
    /// Notify when a metric reaches this percentage
    Percent(u32),
}

impl ThresholdChoice {
    /// Map a raw menu value (0 = off) to a choice
    pub fn from_raw(pct: u32) -> Self {
        if pct == THRESHOLD_OFF {
            ThresholdChoice::Off
        } else {
            ThresholdChoice::Percent(pct)
        }
    }

    /// Raw value used in action identifiers (0 = off)
    pub fn raw(self) -> u32 {
        match self {
            ThresholdChoice::Off => THRESHOLD_OFF,
            ThresholdChoice::Percent(pct) => pct,
        }
    }
}

impl Settings {
    /// Threshold choice currently in effect
    ///
    /// A stored threshold of 0 counts as off regardless of `notifications_enabled`.
    pub fn threshold_choice(&self) -> ThresholdChoice {
        if !self.notifications_enabled || self.notify_threshold == THRESHOLD_OFF {
            ThresholdChoice::Off
        } else {
            ThresholdChoice::Percent(self.notify_threshold)
        }
    }

    /// Apply a threshold selection from the menu
    ///
    /// Selecting "off" only clears `notifications_enabled`; the stored
    /// percentage is left as it was.
    pub fn select_threshold(&mut self, choice: ThresholdChoice) {
        match choice {
            ThresholdChoice::Off => self.notifications_enabled = false,
            ThresholdChoice::Percent(pct) => {
                self.notifications_enabled = true;
                self.notify_threshold = pct;
            }
        }
    }

    /// Validate and normalize values read from disk
    ///
    /// Out-of-domain values fall back to their defaults. A stored threshold
    /// of 0 is folded into `notifications_enabled = false`.
    pub fn validate(&mut self) {
        if !is_valid_interval(self.refresh_interval_secs) {
            self.refresh_interval_secs = default_refresh_interval();
        }

        if self.notify_threshold == THRESHOLD_OFF {
            self.notifications_enabled = false;
            self.notify_threshold = default_notify_threshold();
        } else if !is_valid_threshold(self.notify_threshold) {
            self.notify_threshold = default_notify_threshold();
        }
    }
}

/// Whether `secs` is one of the offered refresh intervals
pub fn is_valid_interval(secs: u64) -> bool {
    REFRESH_INTERVALS.iter().any(|(v, _)| *v == secs)
}

/// Whether `pct` is one of the offered numeric thresholds
pub fn is_valid_threshold(pct: u32) -> bool {
    pct != THRESHOLD_OFF && NOTIFY_THRESHOLDS.iter().any(|(v, _)| *v == pct)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.refresh_interval_secs, 300);
        assert_eq!(settings.notify_threshold, 80);
        assert!(settings.notifications_enabled);
        assert!(!settings.start_at_login);
    }

    #[test]
    fn test_parse_partial_json() {
        let json = r#"{ "refresh_interval_secs": 60, "unknown_field": "x" }"#;

        let settings: Settings = serde_json::from_str(json).expect("Should parse JSON");
        assert_eq!(settings.refresh_interval_secs, 60);
        assert_eq!(settings.notify_threshold, 80);
        assert!(settings.notifications_enabled);
        assert!(!settings.start_at_login);
    }

    #[test]
    fn test_round_trip_every_domain_value() {
        for (secs, _) in REFRESH_INTERVALS {
            for (pct, _) in NOTIFY_THRESHOLDS.iter().filter(|(p, _)| *p != THRESHOLD_OFF) {
                for enabled in [true, false] {
                    for login in [true, false] {
                        let settings = Settings {
                            refresh_interval_secs: secs,
                            notify_threshold: *pct,
                            notifications_enabled: enabled,
                            start_at_login: login,
                        };
                        let json = serde_json::to_string_pretty(&settings).unwrap();
                        let mut parsed: Settings = serde_json::from_str(&json).unwrap();
                        parsed.validate();
                        assert_eq!(parsed, settings);
                    }
                }
            }
        }
    }

    #[test]
    fn test_validate_out_of_domain() {
        let mut settings = Settings {
            refresh_interval_secs: 7,
            notify_threshold: 42,
            notifications_enabled: true,
            start_at_login: false,
        };
        settings.validate();
        assert_eq!(settings.refresh_interval_secs, 300);
        assert_eq!(settings.notify_threshold, 80);
        assert!(settings.notifications_enabled);
    }

    #[test]
    fn test_validate_zero_threshold_means_off() {
        let mut settings = Settings {
            notify_threshold: 0,
            ..Default::default()
        };
        settings.validate();
        assert!(!settings.notifications_enabled);
        assert_eq!(settings.threshold_choice(), ThresholdChoice::Off);
    }

    #[test]
    fn test_threshold_choice() {
        let mut settings = Settings::default();
        assert_eq!(settings.threshold_choice(), ThresholdChoice::Percent(80));

        settings.select_threshold(ThresholdChoice::Off);
        assert_eq!(settings.threshold_choice(), ThresholdChoice::Off);
        assert_eq!(settings.notify_threshold, 80);

        settings.select_threshold(ThresholdChoice::Percent(95));
        assert!(settings.notifications_enabled);
        assert_eq!(settings.threshold_choice(), ThresholdChoice::Percent(95));

        // Stored 0 is off even when the flag says enabled
        settings.notify_threshold = 0;
        assert_eq!(settings.threshold_choice(), ThresholdChoice::Off);
    }

    #[test]
    fn test_threshold_choice_raw() {
        assert_eq!(ThresholdChoice::from_raw(0), ThresholdChoice::Off);
        assert_eq!(ThresholdChoice::from_raw(90), ThresholdChoice::Percent(90));
        assert_eq!(ThresholdChoice::Off.raw(), 0);
        assert_eq!(ThresholdChoice::Percent(70).raw(), 70);
    }
}
