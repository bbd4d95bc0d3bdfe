//! Configuration for roster
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/roster/config.toml)
//! 3. Built-in defaults (lowest priority)

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod observability;
mod serialization;

#[cfg(test)]
mod tests;

pub use observability::{FileLogging, LogRotation, LoggingConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default theme name
pub const DEFAULT_THEME: &str = "dark";

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL returning the JSON array of users
    pub endpoint: String,

    /// Whether to run the TUI (false prints the table once and exits)
    pub enable_tui: bool,

    /// Theme name: "dark", "light"
    pub theme: String,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: crate::users::loader::DEFAULT_ENDPOINT.to_string(),
            enable_tui: true,
            theme: DEFAULT_THEME.to_string(),
            logging: LoggingConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub endpoint: Option<String>,
    pub theme: Option<String>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/roster/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("roster").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    /// Called during startup to help users discover configuration options
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        if path.exists() {
            return;
        }

        // Config is optional - a read-only home directory is not an error
        let _ = Self::write_template(&path);
    }

    /// Write the default template to `path`, creating parent directories
    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        std::fs::write(path, Self::default().to_toml())
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Read and parse a config file; a missing file yields defaults
    pub(crate) fn load_file_config_at(path: &Path) -> Result<FileConfig> {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
            Err(e) => Err(e).with_context(|| format!("Cannot read {}", path.display())),
        }
    }

    /// Load file config if it exists
    ///
    /// # Panics
    /// Exits the process if the config file exists but cannot be read or
    /// parsed. A broken config should fail fast with a clear error, not
    /// silently fall back to defaults.
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match Self::load_file_config_at(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                eprintln!("║  CONFIG ERROR - Failed to load configuration file           ║");
                eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                eprintln!("  File: {}\n", path.display());
                eprintln!("  Error: {:#}\n", e);
                eprintln!("  To reset, run `roster config --reset`.\n");
                std::process::exit(1);
            }
        }
    }

    /// Load configuration: file -> env vars -> defaults
    pub fn from_env() -> Self {
        let file = Self::load_file_config();
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Merge a parsed file with an environment lookup
    pub(crate) fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        // Endpoint: env > file > default
        let endpoint = env("ROSTER_ENDPOINT")
            .or(file.endpoint)
            .unwrap_or(defaults.endpoint);

        // TUI toggle: env only (runtime flag)
        let enable_tui = env("ROSTER_NO_TUI")
            .map(|v| v != "1" && v.to_lowercase() != "true")
            .unwrap_or(defaults.enable_tui);

        // Theme: env > file > default
        let theme = env("ROSTER_THEME")
            .or(file.theme)
            .unwrap_or(defaults.theme);

        let logging = LoggingConfig::from_file(file.logging);

        Self {
            endpoint,
            enable_tui,
            theme,
            logging,
        }
    }
}
