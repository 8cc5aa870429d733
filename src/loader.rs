//! Config and inventory file loading.
//!
//! The config file is looked up in this order:
//!
//! 1. `$XDG_CONFIG_HOME/ansimux/config.toml`
//! 2. `~/.config/ansimux/config.toml`
//!
//! A missing config file is not an error; built-in defaults apply. A missing
//! inventory file is.

use crate::config::Config;
use crate::error::{AnsimuxError, Result};
use crate::inventory::{self, Inventory};
use std::path::{Path, PathBuf};

/// Determine the config file path.
///
/// Returns the first existing candidate, or `~/.config/ansimux/config.toml`
/// when none exists.
///
/// # Errors
///
/// Returns [`AnsimuxError::NoConfigDir`] if the home directory cannot be determined.
pub fn default_config_path() -> Result<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg).join("ansimux").join("config.toml");
        if path.exists() {
            return Ok(path);
        }
    }

    let home = dirs::home_dir().ok_or(AnsimuxError::NoConfigDir)?;
    Ok(home.join(".config").join("ansimux").join("config.toml"))
}

/// Load and parse a config file, falling back to defaults if it doesn't exist.
///
/// # Errors
///
/// - [`AnsimuxError::IoError`] if reading fails
/// - [`AnsimuxError::ConfigParse`] if TOML parsing fails
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        log::debug!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    log::debug!("Loading config from {}", path.display());
    let contents = std::fs::read_to_string(path)?;
    Ok(Config::from_str(&contents)?)
}

/// Load config from the default path.
///
/// Without a resolvable home directory there is nowhere to look, so the
/// built-in defaults are used.
pub fn load_default_config() -> Result<Config> {
    match default_config_path() {
        Ok(path) => load_config(&path),
        Err(AnsimuxError::NoConfigDir) => Ok(Config::default()),
        Err(e) => Err(e),
    }
}

/// Inventory file formats understood by [`load_inventory`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InventoryFormat {
    /// Ansible INI inventory.
    Ini,
    /// Ansible YAML inventory.
    Yaml,
}

impl InventoryFormat {
    /// Pick the format from the file extension: `.yml`/`.yaml` are YAML,
    /// everything else is INI.
    pub fn detect(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml") => {
                InventoryFormat::Yaml
            }
            _ => InventoryFormat::Ini,
        }
    }
}

/// Load and parse an inventory file.
///
/// # Errors
///
/// - [`AnsimuxError::InventoryNotFound`] if the file doesn't exist
/// - [`AnsimuxError::IoError`] if reading fails
/// - any parse error of the detected format
pub fn load_inventory(path: &Path) -> Result<Inventory> {
    if !path.exists() {
        return Err(AnsimuxError::InventoryNotFound(path.to_path_buf()));
    }
    let contents = std::fs::read_to_string(path)?;
    let format = InventoryFormat::detect(path);
    log::debug!("Loading {:?} inventory from {}", format, path.display());

    let inventory = match format {
        InventoryFormat::Ini => inventory::ini::parse(&path.display().to_string(), &contents)?,
        InventoryFormat::Yaml => inventory::yaml::parse(&contents)?,
    };
    log::debug!(
        "Inventory has {} groups and {} hosts",
        inventory.groups().len(),
        inventory.hosts().len()
    );
    Ok(inventory)
}
