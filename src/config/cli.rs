use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use usagebar_core::config::default_data_dir;
use usagebar_core::usage::CommandSource;

/// Command line configuration
#[derive(Parser, Debug)]
#[command(author, version, about = "Menu bar monitor for AI usage limits")]
pub struct Config {
    /// Enable debug mode
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Directory holding settings.json
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run the tray (default); menu clicks are read from stdin
    Run(RunArgs),
    /// Print the effective settings as JSON
    Settings,
    /// Apply one menu action identifier and print the resulting settings
    ///
    /// The run flags given here are written into the login item when
    /// `start_login` is enabled.
    Click {
        /// Action identifier (e.g. "interval_60", "notify_0", "start_login")
        action_id: String,

        #[command(flatten)]
        run: RunArgs,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Run(RunArgs::default())
    }
}

/// Default timeout for one usage command, in seconds
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Flags describing how the tray runs, shared by `run` and `click`
#[derive(Args, Debug, Clone, PartialEq)]
pub struct RunArgs {
    /// Usage provider backed by a command printing snapshot JSON
    #[arg(long = "source", value_name = "NAME=COMMAND", value_parser = parse_key_val)]
    pub sources: Vec<(String, String)>,

    /// Tray title tag for a provider
    #[arg(long = "tag", value_name = "NAME=TAG", value_parser = parse_key_val)]
    pub tags: Vec<(String, String)>,

    /// Timeout for one usage command, in seconds
    #[arg(long, default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    pub fetch_timeout: u64,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            tags: Vec::new(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

impl RunArgs {
    /// Build command-backed sources from the `NAME=COMMAND` and `NAME=TAG` pairs
    pub fn build_sources(&self) -> Result<Vec<CommandSource>> {
        if let Some((name, _)) = self
            .tags
            .iter()
            .find(|(name, _)| !self.sources.iter().any(|(n, _)| n == name))
        {
            anyhow::bail!("--tag given for unknown source: {}", name);
        }

        let timeout = Duration::from_secs(self.fetch_timeout);
        self.sources
            .iter()
            .map(|(name, command)| {
                let mut source = CommandSource::new(name.clone(), command)?.with_timeout(timeout);
                if let Some((_, tag)) = self.tags.iter().rev().find(|(n, _)| n == name) {
                    source = source.with_tag(tag.clone());
                }
                Ok(source)
            })
            .collect()
    }

    fn push_args(&self, args: &mut Vec<String>) {
        for (name, command) in &self.sources {
            args.push("--source".to_string());
            args.push(format!("{}={}", name, command));
        }
        for (name, tag) in &self.tags {
            args.push("--tag".to_string());
            args.push(format!("{}={}", name, tag));
        }
        args.push("--fetch-timeout".to_string());
        args.push(self.fetch_timeout.to_string());
    }
}

impl Config {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Subcommand to execute, `run` when none was given
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or_default()
    }

    /// Resolve the data directory
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_data_dir().context("Could not determine the user data directory"),
        }
    }

    /// Run flags of this invocation (defaults for `settings`)
    pub fn run_args(&self) -> RunArgs {
        match &self.command {
            Some(Command::Run(run)) | Some(Command::Click { run, .. }) => run.clone(),
            Some(Command::Settings) | None => RunArgs::default(),
        }
    }

    /// Arguments that relaunch the tray at login with this invocation's run flags
    pub fn launch_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(dir) = &self.data_dir {
            args.push("--data-dir".to_string());
            args.push(dir.to_string_lossy().into_owned());
        }
        args.push("run".to_string());
        self.run_args().push_args(&mut args);
        args
    }
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{}`", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing name in `{}`", s));
    }
    Ok((key.to_string(), value.trim().to_string()))
}
