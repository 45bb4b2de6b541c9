//! Core of the usagebar tray monitor: settings persistence, threshold
//! notifications, refresh scheduling and the tray menu controller.

pub mod api;
pub mod autostart;
pub mod config;
pub mod menu;
pub mod monitor;
pub mod notifications;
pub mod usage;

pub use api::{ApiError, CoreEvent, UsageCore, UsageCoreBuilder};
