mod settings;
mod store;

pub use settings::{
    is_valid_interval, is_valid_threshold, Settings, ThresholdChoice, NOTIFY_THRESHOLDS,
    REFRESH_INTERVALS, THRESHOLD_OFF,
};
pub use store::{default_data_dir, SettingsError, SettingsStore, SETTINGS_FILE};
