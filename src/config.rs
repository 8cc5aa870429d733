//! Configuration types for ansimux.
//!
//! The config file is optional. It only supplies defaults for settings that
//! were not given on the command line.
//!
//! # Config Format
//!
//! ```toml
//! [defaults]
//! inventory = "~/src/infra/hosts"
//! group = "web"
//! session = "ops"
//! ```

use serde::Deserialize;
use std::path::PathBuf;

/// Built-in inventory location, used when neither flag nor config set one.
pub const DEFAULT_INVENTORY: &str = "/etc/ansible/hosts";

/// Built-in group, used when neither flag nor config set one.
pub const DEFAULT_GROUP: &str = "all";

/// Default settings applied when not given on the command line.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    /// Inventory path. A leading `~/` expands to the home directory.
    pub inventory: Option<String>,
    /// Inventory group to open.
    pub group: Option<String>,
    /// Tmux session name.
    pub session: Option<String>,
}

/// Top-level configuration structure.
///
/// Parsed from `~/.config/ansimux/config.toml` (or XDG equivalent).
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Global default settings.
    #[serde(default)]
    pub defaults: Defaults,
}

impl Config {
    /// Parse config from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `toml::de::Error` if the TOML is malformed or has unknown keys.
    pub fn from_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// The configured inventory path with `~/` expanded, if any.
    pub fn inventory_path(&self) -> Option<PathBuf> {
        self.defaults.inventory.as_deref().map(expand_tilde)
    }
}

/// Expand a leading `~/` (or a lone `~`) to the home directory.
///
/// Paths are returned unchanged when the home directory is unknown.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(home) = dirs::home_dir() {
        if path == "~" {
            return home;
        }
        if let Some(rest) = path.strip_prefix("~/") {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
