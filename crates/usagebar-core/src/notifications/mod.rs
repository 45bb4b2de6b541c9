//! Threshold notifications: crossing detection and dispatch.

pub mod dispatcher;
pub mod tracker;

pub use dispatcher::{dispatch, Notifier};
pub use tracker::{decide, CrossingTracker, Notification, NotifyPolicy, Transition};
