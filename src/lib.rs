pub mod autostart;
pub mod config;
pub mod notify;
pub mod tray;
