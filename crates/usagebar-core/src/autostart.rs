//! Login-item registration contract.
//!
//! The platform registration lives outside the core; this module only
//! defines what the core needs from it and how failures are absorbed.

use anyhow::Result;
use tracing::{info, warn};

/// OS-level "start at login" registration
pub trait Autostart: Send + Sync {
    /// Register the app to launch at login
    fn enable(&self) -> Result<()>;

    /// Remove the login registration
    fn disable(&self) -> Result<()>;

    /// Whether the app is currently registered
    fn is_enabled(&self) -> Result<bool>;
}

/// Enable or disable registration, logging and swallowing any failure
///
/// Returns whether the registration call succeeded. The persisted
/// `start_at_login` preference and the OS registration can diverge when it
/// does not.
pub fn apply_autostart<A: Autostart + ?Sized>(autostart: &A, enabled: bool) -> bool {
    let result = if enabled {
        autostart.enable()
    } else {
        autostart.disable()
    };

    match result {
        Ok(()) => {
            info!(enabled, "Login item updated");
            true
        }
        Err(e) => {
            warn!(enabled, error = %e, "Failed to update login item");
            false
        }
    }
}
