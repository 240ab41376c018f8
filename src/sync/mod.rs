//! Reconciliation of a local project against the module template
//!
//! - [`compare`]: byte-for-byte file comparison
//! - [`files`]: classification and resolution of every file in both trees
//! - [`manifest`]: `package.json` dependency and script reconciliation
//! - [`yarnrc`]: pinned Yarn version, plugins and `.yarnrc.yml`
//! - [`version`]: semantic-version range helpers shared by the above
//! - [`walk`]: which files are compared at all
//!
//! Every reconciler receives a [`SyncContext`]. Nothing in here keeps global
//! state; the run mode is fixed when the context is built.

pub mod compare;
pub mod files;
pub mod manifest;
pub mod version;
pub mod walk;
pub mod yarnrc;

use std::fmt;
use std::path::Path;

use crate::error::Result;
use crate::git::DiffViewer;
use crate::package_manager::PackageManager;
use crate::ui::{self, ProgressReporter, Prompt};

/// Whether the run may modify the local project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Report drift only; never prompt, never write
    Check,
    /// Apply changes, prompting where the operator has to decide
    Write,
}

/// How an entry compares between the template and the local project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Identical,
    Modified,
    MissingLocally,
    MissingUpstream,
}

/// What was (or should be) done about a classified entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Keep,
    Overwrite,
    Skip,
    Remove,
    /// Not an outcome: the operator wants to see the diff and choose again
    ShowDiff,
}

impl Resolution {
    pub fn is_terminal(self) -> bool {
        self != Resolution::ShowDiff
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Resolution::Keep => "Keep",
            Resolution::Overwrite => "Overwrite",
            Resolution::Skip => "Skip",
            Resolution::Remove => "Remove",
            Resolution::ShowDiff => "Show diff",
        };
        f.write_str(label)
    }
}

/// Everything a reconciler needs for one run
pub struct SyncContext<'a> {
    pub mode: RunMode,
    pub template_root: &'a Path,
    pub local_root: &'a Path,
    pub reporter: &'a dyn ProgressReporter,
    pub prompt: &'a dyn Prompt,
    pub diff: &'a dyn DiffViewer,
    pub package_manager: &'a dyn PackageManager,
}

impl SyncContext<'_> {
    pub fn is_check(&self) -> bool {
        self.mode == RunMode::Check
    }

    /// Prompt with the progress indicator paused
    pub fn ask(&self, message: &str, choices: &[Resolution]) -> Result<Resolution> {
        ui::paused(self.reporter, || self.prompt.choose(message, choices))
    }
}
