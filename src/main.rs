//! Ansimux CLI entry point.
//!
//! This binary provides the `ansimux` command, which opens a tmux window
//! with an ssh session for every host of an Ansible inventory group.

use ansimux::cli::Cli;
use ansimux::error::Result;
use ansimux::{loader, resolver, tmux};
use clap::Parser;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic.
fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = loader::load_default_config()?;
    let settings = cli.settings(&config);

    if !cli.hosts.is_empty() {
        log::debug!(
            "Ignoring positional hosts {:?}, opening all of '{}'",
            cli.hosts,
            settings.group
        );
    }

    let session = match settings.session {
        Some(session) => session,
        None => tmux::default_session_name()?,
    };

    let inventory = loader::load_inventory(&settings.inventory)?;
    let source = settings.inventory.display().to_string();
    let hosts = resolver::resolve(&inventory, &source, &settings.group)?;
    let directives = tmux::build(&session, &hosts);

    // Each directive runs in its own shell, despite the `&&` in the summary.
    tmux::launch(&directives, cli.is_dry_run(), &mut std::io::stdout().lock())
}
