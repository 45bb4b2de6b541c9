//! Start-at-login registration.
//!
//! macOS: a LaunchAgent plist with `RunAtLoad`. Elsewhere: an XDG autostart
//! `.desktop` entry. Registration state is the presence of that file.

use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use usagebar_core::autostart::Autostart;

#[cfg(target_os = "macos")]
const LAUNCH_AGENT_LABEL: &str = "com.usagebar.app";

#[cfg(not(target_os = "macos"))]
const DESKTOP_ENTRY_FILE: &str = "usagebar.desktop";

/// Login item for the running executable
#[derive(Debug, Clone)]
pub struct LoginItem {
    /// Registration file (plist or desktop entry)
    path: PathBuf,
    /// Executable launched at login
    exe: PathBuf,
    /// Arguments passed to the executable
    args: Vec<String>,
}

impl LoginItem {
    /// Login item for the current executable at the platform's default location
    pub fn new(args: Vec<String>) -> Result<Self> {
        let exe = std::env::current_exe().context("Failed to resolve current executable")?;
        Ok(Self::with_paths(default_entry_path()?, exe, args))
    }

    /// Login item with explicit registration file and executable
    pub fn with_paths(path: PathBuf, exe: PathBuf, args: Vec<String>) -> Self {
        Self { path, exe, args }
    }

    /// Registration file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(target_os = "macos")]
    fn entry_contents(&self) -> String {
        let exe = self.exe.to_string_lossy();
        let mut program_args = format!("        <string>{}</string>\n", xml_escape(&exe));
        for arg in &self.args {
            program_args.push_str(&format!("        <string>{}</string>\n", xml_escape(arg)));
        }
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>Label</key>
    <string>{}</string>
    <key>ProgramArguments</key>
    <array>
{}    </array>
    <key>RunAtLoad</key>
    <true/>
</dict>
</plist>
"#,
            LAUNCH_AGENT_LABEL, program_args
        )
    }

    #[cfg(not(target_os = "macos"))]
    fn entry_contents(&self) -> String {
        let mut exec = desktop_quote(&self.exe.to_string_lossy());
        for arg in &self.args {
            exec.push(' ');
            exec.push_str(&desktop_quote(arg));
        }
        format!(
            "[Desktop Entry]\n\
             Type=Application\n\
             Name=usagebar\n\
             Comment=Menu bar monitor for AI usage limits\n\
             Exec={}\n\
             Terminal=false\n\
             X-GNOME-Autostart-enabled=true\n",
            exec
        )
    }
}

impl Autostart for LoginItem {
    fn enable(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        fs::write(&self.path, self.entry_contents())
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        debug!(path = ?self.path, "Login item registered");
        Ok(())
    }

    fn disable(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = ?self.path, "Login item removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to remove {}", self.path.display()))
            }
        }
    }

    fn is_enabled(&self) -> Result<bool> {
        Ok(self.path.exists())
    }
}

#[cfg(target_os = "macos")]
fn default_entry_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home
        .join("Library/LaunchAgents")
        .join(format!("{}.plist", LAUNCH_AGENT_LABEL)))
}

#[cfg(not(target_os = "macos"))]
fn default_entry_path() -> Result<PathBuf> {
    let config = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config.join("autostart").join(DESKTOP_ENTRY_FILE))
}

#[cfg(target_os = "macos")]
fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Quote an Exec argument when it contains spaces or reserved characters
#[cfg(not(target_os = "macos"))]
fn desktop_quote(s: &str) -> String {
    let needs_quotes = s.is_empty()
        || s
            .chars()
            .any(|c| c.is_whitespace() || "\"'\\><~|&;$*?#()`".contains(c));
    if !needs_quotes {
        return s.to_string();
    }
    let mut quoted = String::from("\"");
    for c in s.chars() {
        if matches!(c, '"' | '`' | '$' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(dir: &Path) -> LoginItem {
        LoginItem::with_paths(
            dir.join("autostart").join("entry"),
            PathBuf::from("/opt/usagebar/bin/usagebar"),
            vec![
                "run".to_string(),
                "--source".to_string(),
                "Claude=claude-usage --json".to_string(),
            ],
        )
    }

    #[test]
    fn test_enable_disable_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let login = item(dir.path());

        assert!(!login.is_enabled().unwrap());
        login.enable().unwrap();
        assert!(login.is_enabled().unwrap());

        // Enabling twice rewrites the same entry
        login.enable().unwrap();
        assert!(login.is_enabled().unwrap());

        login.disable().unwrap();
        assert!(!login.is_enabled().unwrap());

        // Already absent is not an error
        login.disable().unwrap();
    }

    #[test]
    fn test_enable_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("autostart"), "").unwrap();

        let login = item(dir.path());
        assert!(login.enable().is_err());
        assert!(!login.is_enabled().unwrap());
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn test_desktop_entry_contents() {
        let dir = tempfile::tempdir().unwrap();
        let login = item(dir.path());
        login.enable().unwrap();

        let contents = fs::read_to_string(login.path()).unwrap();
        assert!(contents.starts_with("[Desktop Entry]\n"));
        assert!(contents.contains(
            "Exec=/opt/usagebar/bin/usagebar run --source \"Claude=claude-usage --json\"\n"
        ));
        assert!(contents.contains("X-GNOME-Autostart-enabled=true\n"));
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn test_launch_agent_contents() {
        let dir = tempfile::tempdir().unwrap();
        let login = item(dir.path());
        login.enable().unwrap();

        let contents = fs::read_to_string(login.path()).unwrap();
        assert!(contents.contains("<string>com.usagebar.app</string>"));
        assert!(contents.contains("<string>/opt/usagebar/bin/usagebar</string>"));
        assert!(contents.contains("<string>Claude=claude-usage --json</string>"));
        assert!(contents.contains("<key>RunAtLoad</key>\n    <true/>"));
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn test_default_path_under_xdg_config() {
        let home = tempfile::tempdir().unwrap();
        temp_env::with_vars(
            [
                ("HOME", Some(home.path().as_os_str())),
                ("XDG_CONFIG_HOME", None),
            ],
            || {
                let path = default_entry_path().unwrap();
                assert_eq!(path, home.path().join(".config/autostart/usagebar.desktop"));
            },
        );
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn test_default_path_under_launch_agents() {
        let home = tempfile::tempdir().unwrap();
        temp_env::with_var("HOME", Some(home.path()), || {
            let path = default_entry_path().unwrap();
            assert_eq!(
                path,
                home.path()
                    .join("Library/LaunchAgents/com.usagebar.app.plist")
            );
        });
    }
}
