//! User configuration for sightnotes.
//!
//! Read once at startup from `$XDG_CONFIG_HOME/sightnotes/config.toml`
//! (falling back to `~/.config/sightnotes/config.toml`). Every key is optional:
//!
//! ```toml
//! theme = "dark"                           # or "catppuccin-mocha"
//! base_url = "http://localhost:5001/api"   # capture API server
//! notes_dir = "/path/to/notes"             # read .md files directly instead
//! ```
//!
//! Config errors are soft failures: they are logged and defaults are used.

use std::path::PathBuf;

use serde::Deserialize;
use sightnotes_core::source::DEFAULT_BASE_URL;

/// Parsed configuration with defaults filled in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme: String,
    /// Base URL of the capture API; `/latest`, `/sessions` and `/notes/..` hang off it.
    pub base_url: String,
    /// When set, notes are read from this directory and `base_url` is unused.
    pub notes_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "catppuccin-mocha".to_owned(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            notes_dir: None,
        }
    }
}

/// Returns the path to the sightnotes config file.
///
/// Prefers `$XDG_CONFIG_HOME/sightnotes/config.toml`; falls back to
/// `~/.config/sightnotes/config.toml` when the env var is absent.
pub fn config_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(".config")))
        .unwrap_or_else(|| PathBuf::from(".config"));
    base.join("sightnotes").join("config.toml")
}

/// Loads the config file, returning defaults if it is missing or invalid.
pub fn load() -> Config {
    let path = config_path();
    let raw = match std::fs::read_to_string(&path) {
        Ok(s) => s,
        Err(_) => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Config::default();
        }
    };
    match parse(&raw) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "config parse error, using defaults");
            Config::default()
        }
    }
}

fn parse(raw: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(raw)
}
