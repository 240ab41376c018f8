//! Error types and handling for template-sync
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`fs`]: File system errors
//! - [`git`]: Git operation errors
//! - [`config`]: Manifest and configuration document errors
//! - [`tool`]: External tool (package manager, diff) errors
//!
//! Drift between the template and the local project is never an error; it is
//! reported as a warning by the reconcilers. Everything represented here
//! aborts the run.

pub mod config;
pub mod fs;
pub mod git;
pub mod tool;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for template-sync operations
#[derive(Error, Diagnostic, Debug)]
pub enum SyncError {
    // File system errors
    #[error("File not found: {path}")]
    #[diagnostic(code(template_sync::fs::not_found))]
    FileNotFound { path: String },

    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(template_sync::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(template_sync::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("Failed to remove file: {path}: {reason}")]
    #[diagnostic(code(template_sync::fs::remove_failed))]
    FileRemoveFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(template_sync::fs::io_error))]
    IoError { message: String },

    // Git errors
    #[error("Git operation failed: {message}")]
    #[diagnostic(code(template_sync::git::operation_failed))]
    GitOperationFailed { message: String },

    #[error("Failed to clone repository: {url}: {reason}")]
    #[diagnostic(
        code(template_sync::git::clone_failed),
        help("Check that the template URL is correct and reachable")
    )]
    GitCloneFailed { url: String, reason: String },

    #[error("Failed to update template checkout at '{path}': {reason}")]
    #[diagnostic(
        code(template_sync::git::pull_failed),
        help("Delete the checkout directory to force a fresh clone")
    )]
    GitPullFailed { path: String, reason: String },

    #[error("Not in a git repository")]
    #[diagnostic(
        code(template_sync::git::not_in_repo),
        help("template-sync must be run from within a git repository. Run 'git init' to create one.")
    )]
    NotInGitRepository,

    // Document errors
    #[error("Invalid manifest '{path}': {message}")]
    #[diagnostic(code(template_sync::config::manifest_invalid))]
    ManifestInvalid { path: String, message: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(template_sync::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration '{path}': {message}")]
    #[diagnostic(code(template_sync::config::invalid))]
    ConfigInvalid { path: String, message: String },

    // External tool errors
    #[error("Command `{command}` failed: {reason}")]
    #[diagnostic(code(template_sync::tool::command_failed))]
    ToolFailed { command: String, reason: String },

    #[error("Could not determine tool version in '{dir}': got {output:?}")]
    #[diagnostic(
        code(template_sync::tool::version_invalid),
        help("Make sure yarn is installed and prints a semantic version")
    )]
    ToolVersionInvalid { dir: String, output: String },

    #[error("Prompt failed: {message}")]
    #[diagnostic(code(template_sync::ui::prompt_failed))]
    PromptFailed { message: String },
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for SyncError {
    fn from(err: serde_yaml::Error) -> Self {
        SyncError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<git2::Error> for SyncError {
    fn from(err: git2::Error) -> Self {
        SyncError::GitOperationFailed {
            message: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for SyncError {
    fn from(err: inquire::InquireError) -> Self {
        SyncError::PromptFailed {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, SyncError>;
