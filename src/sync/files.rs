//! File tree reconciliation
//!
//! The forward pass walks the template and brings each file into the local
//! project; the reverse pass walks the local project and flags files the
//! template does not have. Both feed [`apply`], which maps a
//! [`Classification`] and the run mode onto what happens to the file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{
    Result,
    fs::{remove_error, write_error},
};

use super::compare::files_equal;
use super::walk::{IgnoreFilter, project_files};
use super::{Classification, Resolution, RunMode, SyncContext};

const MODIFIED_CHOICES: &[Resolution] =
    &[Resolution::ShowDiff, Resolution::Skip, Resolution::Overwrite];

const UNKNOWN_CHOICES: &[Resolution] = &[Resolution::Skip, Resolution::Remove];

/// A file known by its path relative to both roots
#[derive(Debug, Clone)]
pub struct TreeEntry {
    pub relative: PathBuf,
    pub template: PathBuf,
    pub local: PathBuf,
}

impl TreeEntry {
    pub fn new(ctx: &SyncContext<'_>, relative: PathBuf) -> Self {
        Self {
            template: ctx.template_root.join(&relative),
            local: ctx.local_root.join(&relative),
            relative,
        }
    }

    fn display(&self) -> String {
        self.relative.to_string_lossy().replace('\\', "/")
    }
}

/// Classify a template file against its local counterpart.
pub fn classify(entry: &TreeEntry) -> Result<Classification> {
    if !entry.local.exists() {
        return Ok(Classification::MissingLocally);
    }
    if files_equal(&entry.template, &entry.local)? {
        Ok(Classification::Identical)
    } else {
        Ok(Classification::Modified)
    }
}

/// Forward pass over every template file.
pub fn process_template_files(ctx: &SyncContext<'_>, filter: &IgnoreFilter) -> Result<()> {
    for relative in project_files(ctx.template_root, filter) {
        let entry = TreeEntry::new(ctx, relative?);
        let classification = classify(&entry)?;
        apply(ctx, &entry, classification)?;
    }
    Ok(())
}

/// Reverse pass: local files the template does not have.
///
/// Runs after [`process_template_files`], so every local file with a
/// template counterpart has already been handled.
pub fn check_local_files(ctx: &SyncContext<'_>, filter: &IgnoreFilter) -> Result<()> {
    for relative in project_files(ctx.local_root, filter) {
        let entry = TreeEntry::new(ctx, relative?);
        if entry.template.exists() {
            continue;
        }
        apply(ctx, &entry, Classification::MissingUpstream)?;
    }
    Ok(())
}

/// Resolve one classified entry and carry out the resolution.
pub fn apply(
    ctx: &SyncContext<'_>,
    entry: &TreeEntry,
    classification: Classification,
) -> Result<Resolution> {
    let name = entry.display();
    debug!(path = %name, ?classification, mode = ?ctx.mode, "resolving");

    let resolution = match (classification, ctx.mode) {
        (Classification::Identical, _) => Resolution::Keep,

        (Classification::MissingLocally, RunMode::Check) => {
            ctx.reporter.warn(&format!(
                "File \"{name}\" does not exist locally. It would be created."
            ));
            Resolution::Skip
        }
        (Classification::MissingLocally, RunMode::Write) => {
            ctx.reporter.info(&format!("Processing file \"{name}\"."));
            copy_file(&entry.template, &entry.local)?;
            Resolution::Overwrite
        }

        (Classification::Modified, RunMode::Check) => {
            ctx.reporter
                .warn(&format!("File \"{name}\" differs from the template."));
            Resolution::Skip
        }
        (Classification::Modified, RunMode::Write) => {
            let resolution = resolve_modified(ctx, entry)?;
            match resolution {
                Resolution::Overwrite => {
                    ctx.reporter.info(&format!("Processing file \"{name}\"."));
                    fs::remove_file(&entry.local).map_err(|e| remove_error(&entry.local, &e))?;
                    copy_file(&entry.template, &entry.local)?;
                }
                _ => ctx.reporter.warn(&format!("Skipped file \"{name}\".")),
            }
            resolution
        }

        (Classification::MissingUpstream, RunMode::Check) => {
            ctx.reporter.warn(&format!(
                "File \"{name}\" exists locally, but not in the template."
            ));
            Resolution::Skip
        }
        (Classification::MissingUpstream, RunMode::Write) => {
            let message = format!(
                "File \"{name}\" exists locally, but not in the template. What do you want to do?"
            );
            let resolution = ctx.ask(&message, UNKNOWN_CHOICES)?;
            match resolution {
                Resolution::Remove => {
                    fs::remove_file(&entry.local).map_err(|e| remove_error(&entry.local, &e))?;
                    ctx.reporter.info(&format!("Removed file \"{name}\"."));
                }
                _ => ctx.reporter.warn(&format!("Unknown file \"{name}\".")),
            }
            resolution
        }
    };

    Ok(resolution)
}

/// Ask about a modified file until the operator picks Skip or Overwrite.
fn resolve_modified(ctx: &SyncContext<'_>, entry: &TreeEntry) -> Result<Resolution> {
    let message = format!(
        "File \"{}\" already exists. What do you want to do?",
        entry.display()
    );

    crate::ui::paused(ctx.reporter, || -> Result<Resolution> {
        loop {
            let choice = ctx.prompt.choose(&message, MODIFIED_CHOICES)?;
            if choice.is_terminal() {
                return Ok(choice);
            }
            ctx.diff.show(&entry.template, &entry.local)?;
        }
    })
}

fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| write_error(parent, &e))?;
    }
    fs::copy(from, to).map_err(|e| write_error(to, &e))?;
    debug!(from = %from.display(), to = %to.display(), "copied");
    Ok(())
}
