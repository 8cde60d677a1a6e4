//! Settings for opening the photo database.

use anyhow::{Context, Error};
use camino::{Utf8Path, Utf8PathBuf};
use sea_orm::ConnectOptions;
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "lumina";
const DATABASE_FILE: &str = "lumina.db";
const SETTINGS_FILE: &str = "settings.json";
const MEMORY_URL: &str = "sqlite::memory:";

/// The directory holding the database and the settings file:
/// - Linux: ~/.local/share/lumina
/// - macOS: ~/Library/Application Support/lumina
/// - Windows: %APPDATA%\lumina
pub fn app_dir() -> Utf8PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .and_then(|p| Utf8PathBuf::from_path_buf(p).ok())
        .unwrap_or_else(|| Utf8PathBuf::from("."))
        .join(APP_DIR)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite connection url, either `sqlite://<path>?mode=rwc` or `sqlite::memory:`
    pub database_url: String,
    pub max_connections: u32,
    /// Forward every statement sqlx runs to the log.
    pub sqlx_logging: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::at_path(&app_dir().join(DATABASE_FILE))
    }
}

impl StoreConfig {
    pub fn at_path(path: &Utf8Path) -> Self {
        Self {
            database_url: format!("sqlite://{path}?mode=rwc"),
            max_connections: 4,
            sqlx_logging: false,
        }
    }

    /// A throwaway database. Everything is lost once the store is closed.
    pub fn in_memory() -> Self {
        Self {
            database_url: MEMORY_URL.into(),
            // The in-memory database is dropped with its last connection, one
            // pinned connection is all it needs.
            max_connections: 1,
            sqlx_logging: false,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_url.starts_with(MEMORY_URL)
    }

    /// The file backing the database, if there is one.
    pub fn database_path(&self) -> Option<Utf8PathBuf> {
        let rest = self.database_url.strip_prefix("sqlite://")?;
        let path = rest.split_once('?').map_or(rest, |(path, _)| path);
        (!path.is_empty()).then(|| Utf8PathBuf::from(path))
    }

    pub(crate) fn connect_options(&self) -> ConnectOptions {
        let mut options = ConnectOptions::new(self.database_url.clone());
        options
            .max_connections(self.max_connections.max(1))
            .sqlx_logging(self.sqlx_logging);
        if self.is_in_memory() {
            // Never let the pool reap its idle connection, that would throw the
            // data away.
            options.min_connections(1);
        }
        options
    }
}

/// How log lines are written.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, for a terminal.
    #[default]
    Pretty,
    /// Bunyan JSON lines.
    Json,
}

/// Contents of `settings.json`, every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub store: StoreConfig,
    pub log_format: LogFormat,
    /// Filter used when `RUST_LOG` is not set.
    pub log_filter: Option<String>,
}

impl Settings {
    /// Read settings from a JSON file, missing keys take their defaults.
    pub fn load(path: &Utf8Path) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read settings from {path}"))?;
        serde_json::from_str(&contents).with_context(|| format!("Invalid settings in {path}"))
    }

    /// Load `settings.json` from `directory`, falling back to the defaults when
    /// there is no such file.
    pub fn discover_in(directory: &Utf8Path) -> Result<Self, Error> {
        let path = directory.join(SETTINGS_FILE);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Settings from the application directory, next to the database.
    pub fn discover() -> Result<Self, Error> {
        Self::discover_in(&app_dir())
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or("info")
    }
}
