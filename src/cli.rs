//! Command-line interface for ansimux.
//!
//! Parses arguments using clap and provides the [`Cli`] struct containing
//! all user-specified options, plus [`Settings`], the options after config
//! file defaults have been applied.

use crate::config::{self, Config};
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for ansimux.
///
/// # Examples
///
/// ```bash
/// # Open a window per host of the "web" group
/// ansimux --group web --inventory ./hosts
///
/// # Only print the tmux commands
/// ansimux --group web --dry-run 1
/// ```
#[derive(Parser, Debug)]
#[command(name = "ansimux")]
#[command(version)]
#[command(about = "Open tmux session with ssh to all hosts in the Ansible inventory")]
#[command(long_about = "Ansimux reads an Ansible inventory and opens one tmux window per host\n\
    of the chosen group, each running an ssh session to that host.\n\n\
    The first window creates the session if it doesn't exist yet.")]
pub struct Cli {
    /// Hosts list.
    ///
    /// Accepted for compatibility; the whole group is always opened.
    #[arg(value_name = "HOSTS")]
    pub hosts: Vec<String>,

    /// Host group [default: all].
    #[arg(long, value_name = "NAME")]
    pub group: Option<String>,

    /// Host file [default: /etc/ansible/hosts].
    #[arg(long, value_name = "PATH")]
    pub inventory: Option<PathBuf>,

    /// Dry run: don't run tmux command.
    ///
    /// Any non-empty value enables it; a bare `--dry-run` counts as "true".
    #[arg(long, value_name = "VALUE", num_args = 0..=1, default_missing_value = "true")]
    pub dry_run: Option<String>,

    /// Tmux session name [default: name of the current directory].
    #[arg(short, long, value_name = "NAME")]
    pub session: Option<String>,
}

/// Effective settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Inventory file to load.
    pub inventory: PathBuf,
    /// Group to open.
    pub group: String,
    /// Session name, if given by flag or config.
    pub session: Option<String>,
}

impl Cli {
    /// Whether execution should be skipped.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run.as_deref().is_some_and(|v| !v.is_empty())
    }

    /// Apply config defaults to the parsed flags.
    ///
    /// Precedence: CLI flag > config file > built-in default.
    pub fn settings(&self, config: &Config) -> Settings {
        let inventory = self
            .inventory
            .clone()
            .or_else(|| config.inventory_path())
            .unwrap_or_else(|| PathBuf::from(config::DEFAULT_INVENTORY));
        let group = self
            .group
            .clone()
            .or_else(|| config.defaults.group.clone())
            .unwrap_or_else(|| config::DEFAULT_GROUP.to_string());
        let session = self
            .session
            .clone()
            .or_else(|| config.defaults.session.clone());

        Settings {
            inventory,
            group,
            session,
        }
    }
}
