//! Tray menu: click identifiers, the settings-derived projection, and the
//! controller that applies clicks.

pub mod action;
pub mod controller;
pub mod model;

pub use action::{
    interval_id, notify_id, MenuAction, INTERVAL_PREFIX, NOTIFY_PREFIX, QUIT_ID, REFRESH_NOW_ID,
    SHOW_HIDE_ID, START_LOGIN_ID,
};
pub use controller::{ClickOutcome, MenuController, MenuError};
pub use model::{CheckItem, MenuEntry, RadioGroup, TrayMenu};
