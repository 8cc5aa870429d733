//! Error types for ansimux.
//!
//! All errors in ansimux are represented by [`AnsimuxError`], which covers
//! inventory loading, group resolution, configuration and process spawning.

use std::path::PathBuf;
use thiserror::Error;

/// All possible errors that can occur in ansimux.
#[derive(Error, Debug)]
pub enum AnsimuxError {
    /// Requested group does not exist in the inventory.
    #[error("No group '{group}' found in {inventory}")]
    GroupNotFound {
        /// The group that was asked for.
        group: String,
        /// The inventory source it was looked up in.
        inventory: String,
    },

    /// Inventory file does not exist at the given path.
    #[error("Inventory not found: {0}")]
    InventoryNotFound(PathBuf),

    /// Failed to read a file from disk.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// A line of an INI inventory could not be parsed.
    #[error("{path}:{line}: {message}")]
    InventoryParse {
        /// Inventory source being parsed.
        path: String,
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    /// Group children form a cycle (A -> B -> A).
    #[error("Circular group membership detected: {0}")]
    CircularGroup(String),

    /// YAML inventory is not valid YAML.
    #[error("Failed to parse YAML inventory: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// YAML inventory is valid YAML but not an inventory.
    #[error("Invalid YAML inventory: {0}")]
    InvalidYaml(String),

    /// TOML parsing of the config file failed.
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Could not determine the user's config directory.
    #[error("Could not determine config directory")]
    NoConfigDir,

    /// The shell used to run a directive could not be started.
    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        /// The directive that was being run.
        command: String,
        /// Underlying spawn failure.
        source: std::io::Error,
    },
}

/// Convenient Result type alias for ansimux operations.
pub type Result<T> = std::result::Result<T, AnsimuxError>;
