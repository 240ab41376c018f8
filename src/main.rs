//! template-sync - keep a JavaScript module in sync with its module template
//!
//! Clones (or updates) the module template and reconciles the current project
//! with it: shared files, `package.json` dependencies and scripts, and the
//! pinned Yarn version with its plugins. `--check` reports drift without
//! changing anything.

use std::path::Path;

use clap::Parser;

mod cli;
mod commands;
mod config;
mod error;
mod git;
mod logging;
mod package_manager;
mod sync;
#[cfg(test)]
mod test_fixtures;
mod ui;

use cli::Cli;
use error::{Result, SyncError, fs as fs_error};

/// Check that `path` is inside a git repository
fn check_git_repository(path: &Path) -> Result<()> {
    if git2::Repository::discover(path).is_err() {
        return Err(SyncError::NotInGitRepository);
    }

    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let local_root = std::env::current_dir()
        .map_err(|e| fs_error::io_error(format!("Failed to read current directory: {e}")))?;

    check_git_repository(&local_root)?;
    commands::sync::run(cli, &local_root)
}

fn main() {
    let cli = Cli::parse();
    logging::init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
