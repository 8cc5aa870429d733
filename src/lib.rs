//! # Ansimux
//!
//! Open a tmux session with an ssh window for every host of an Ansible
//! inventory group.
//!
//! Ansimux reads an inventory, merges each host's variables over its group's
//! variables, and turns every host into a tmux directive. The first directive
//! creates the session (or adds to it if it already exists); the rest open
//! new windows in it.
//!
//! ## Quick Example
//!
//! ```ini
//! # ./hosts
//! [web]
//! h1 ansible_user=deploy
//! h2 ansible_host=10.0.0.2
//! ```
//!
//! ```bash
//! ansimux --inventory ./hosts --group web --dry-run 1
//! ```
//!
//! prints the directives for `ssh deploy@h1` and `ssh 10.0.0.2` joined
//! with ` && `.
//!
//! ## Architecture
//!
//! The crate is organized into these modules:
//!
//! - [`inventory`]: Inventory model plus INI and YAML parsers
//! - [`loader`]: Config and inventory file loading
//! - [`resolver`]: Group lookup and group/host variable merging
//! - [`ssh`]: SSH target resolution from inventory variables
//! - [`tmux`]: Directive sequencing, rendering and execution
//! - [`interpolate`]: Template placeholder substitution
//! - [`config`]: Optional TOML config file
//! - [`cli`]: Command-line argument parsing with clap
//! - [`error`]: Error types

pub mod cli;
pub mod config;
pub mod error;
pub mod interpolate;
pub mod inventory;
pub mod loader;
pub mod resolver;
pub mod ssh;
pub mod tmux;

pub use config::Config;
pub use error::{AnsimuxError, Result};
pub use inventory::{Group, Host, Inventory, Vars};
pub use resolver::ResolvedHost;
pub use tmux::Directive;
