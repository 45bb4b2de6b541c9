//! Desktop notifications through the platform's notification command.

use anyhow::{Context, Result};
use std::process::Stdio;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::debug;

use usagebar_core::notifications::Notifier;

#[cfg(not(target_os = "macos"))]
const APP_NAME: &str = "usagebar";

/// Fire-and-forget OS notifier
///
/// macOS goes through `osascript`, other systems through `notify-send`.
/// Only a failure to spawn the command is reported; the child is reaped in
/// a background task. Must be called from within a Tokio runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<()> {
        spawn_reaped(notification_command(title, body))?;
        Ok(())
    }
}

/// Spawn `cmd` and wait for it in a background task
fn spawn_reaped(mut cmd: Command) -> Result<JoinHandle<()>> {
    let runtime = tokio::runtime::Handle::try_current()
        .context("Desktop notifications need a running Tokio runtime")?;
    let program = cmd.as_std().get_program().to_owned();
    debug!(?cmd, "Sending desktop notification");

    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to spawn {:?}", program))?;

    Ok(runtime.spawn(async move {
        match child.wait().await {
            Ok(status) if !status.success() => {
                debug!(?program, %status, "Notification command failed");
            }
            Ok(_) => {}
            Err(e) => debug!(?program, error = %e, "Failed to wait for notification command"),
        }
    }))
}

#[cfg(target_os = "macos")]
fn notification_command(title: &str, body: &str) -> Command {
    let script = format!(
        "display notification {} with title {}",
        applescript_string(body),
        applescript_string(title)
    );
    let mut cmd = Command::new("osascript");
    cmd.arg("-e").arg(script);
    cmd
}

#[cfg(not(target_os = "macos"))]
fn notification_command(title: &str, body: &str) -> Command {
    let mut cmd = Command::new("notify-send");
    cmd.arg("--app-name").arg(APP_NAME).arg(title).arg(body);
    cmd
}

/// Quote a string as an AppleScript literal
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn applescript_string(s: &str) -> String {
    let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_applescript_string_escapes_quotes() {
        assert_eq!(applescript_string("plain"), "\"plain\"");
        assert_eq!(
            applescript_string(r#"say "hi" \ bye"#),
            r#""say \"hi\" \\ bye""#
        );
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn test_notify_send_arguments() {
        let cmd = notification_command("Claude session at 82%", "Resets in 1h 5m");
        let cmd = cmd.as_std();
        assert_eq!(cmd.get_program(), "notify-send");
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            vec![
                "--app-name",
                "usagebar",
                "Claude session at 82%",
                "Resets in 1h 5m"
            ]
        );
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn test_osascript_arguments() {
        let cmd = notification_command("Claude session at 82%", "Resets in 1h 5m");
        let cmd = cmd.as_std();
        assert_eq!(cmd.get_program(), "osascript");
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            vec![
                "-e",
                "display notification \"Resets in 1h 5m\" with title \"Claude session at 82%\""
            ]
        );
    }

    #[tokio::test]
    async fn test_spawned_command_is_reaped() {
        let handle = spawn_reaped(Command::new("true")).unwrap();
        // The wait task only finishes once the child has exited and been reaped
        tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_spawn_failure_is_reported() {
        let err = spawn_reaped(Command::new("usagebar-no-such-notifier")).unwrap_err();
        assert!(err.to_string().contains("Failed to spawn"));
    }

    #[test]
    fn test_notify_outside_runtime_is_an_error() {
        let err = spawn_reaped(Command::new("true")).unwrap_err();
        assert!(err.to_string().contains("Tokio runtime"));
    }
}
