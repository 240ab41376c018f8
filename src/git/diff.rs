//! Textual diff display between two arbitrary files

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::{Result, tool};

/// Shows the operator how a local file differs from its template counterpart
pub trait DiffViewer {
    fn show(&self, template: &Path, local: &Path) -> Result<()>;
}

/// `git diff --no-index`, attached to the terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct GitDiff;

impl DiffViewer for GitDiff {
    fn show(&self, template: &Path, local: &Path) -> Result<()> {
        let status = Command::new("git")
            .args(["diff", "--no-index", "--"])
            .arg(template)
            .arg(local)
            .status()
            .map_err(|e| tool::command_failed("git diff --no-index", e.to_string()))?;

        // Exit status 1 only means the files differ.
        debug!(
            template = %template.display(),
            local = %local.display(),
            code = ?status.code(),
            "displayed diff"
        );
        Ok(())
    }
}
