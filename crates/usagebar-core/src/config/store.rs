//! File-backed settings store.
//!
//! `SettingsStore` owns the single in-memory copy of [`Settings`]. Updates are
//! copy-mutate-persist-commit: the mutation is applied to a copy, the copy is
//! written to disk, and only then does it become visible to readers.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};
use thiserror::Error;
use tracing::{debug, warn};

use super::settings::Settings;

/// File name of the persisted settings inside the data directory
pub const SETTINGS_FILE: &str = "settings.json";

/// Error raised when settings cannot be persisted
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Creating, writing or renaming the settings file failed
    #[error("failed to write settings file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings could not be serialized
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Default data directory (`<data_dir>/usagebar`)
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("usagebar"))
}

/// Single source of truth for user preferences
pub struct SettingsStore {
    /// Committed settings, read by `get`
    current: RwLock<Settings>,
    /// Serializes `update` calls, including their file writes
    write_lock: Mutex<()>,
    /// Path of the backing JSON file
    path: PathBuf,
}

impl SettingsStore {
    /// Open the store backed by `settings.json` in `data_dir`
    ///
    /// Missing or malformed files yield defaults. Nothing is written until
    /// the first successful `update`.
    pub fn open(data_dir: impl AsRef<Path>) -> Self {
        Self::with_path(data_dir.as_ref().join(SETTINGS_FILE))
    }

    /// Open the store backed by an explicit file path
    pub fn with_path(path: PathBuf) -> Self {
        let settings = Self::load(&path);
        Self {
            current: RwLock::new(settings),
            write_lock: Mutex::new(()),
            path,
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and normalize the backing file, falling back to defaults
    fn load(path: &Path) -> Settings {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                debug!(path = ?path, error = %e, "No settings file, using defaults");
                return Settings::default();
            }
        };

        match serde_json::from_str::<Settings>(&content) {
            Ok(mut settings) => {
                settings.validate();
                settings
            }
            Err(e) => {
                warn!(path = ?path, error = %e, "Malformed settings file, using defaults");
                Settings::default()
            }
        }
    }

    /// Current settings (owned copy)
    pub fn get(&self) -> Settings {
        self.current.read().clone()
    }

    /// Apply `mutator` to a copy of the current settings, persist it, then commit
    ///
    /// On a write failure the committed settings are left untouched and the
    /// error is returned. Concurrent updates are applied one at a time.
    pub fn update<F>(&self, mutator: F) -> Result<Settings, SettingsError>
    where
        F: FnOnce(&mut Settings),
    {
        let _guard = self.write_lock.lock();

        let mut next = self.current.read().clone();
        mutator(&mut next);

        self.persist(&next)?;

        *self.current.write() = next.clone();
        debug!(?next, "Settings committed");
        Ok(next)
    }

    /// Write settings atomically (temp file + rename)
    fn persist(&self, settings: &Settings) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(settings)?;

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(io_err(dir))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        // Leftover from an earlier failed write
        let _ = fs::remove_file(&temp_path);

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)
            .map_err(io_err(&temp_path))?;
        file.write_all(json.as_bytes()).map_err(io_err(&temp_path))?;
        file.sync_all().map_err(io_err(&temp_path))?;

        fs::rename(&temp_path, &self.path).map_err(io_err(&self.path))?;
        Ok(())
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> SettingsError {
    let path = path.to_path_buf();
    move |source| SettingsError::Io { path, source }
}
