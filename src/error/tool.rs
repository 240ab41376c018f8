//! External tool errors

use super::SyncError;

/// Creates a command failed error
pub fn command_failed(command: impl Into<String>, reason: impl Into<String>) -> SyncError {
    SyncError::ToolFailed {
        command: command.into(),
        reason: reason.into(),
    }
}

/// Creates an error for unparseable `--version` output
pub fn version_invalid(dir: impl Into<String>, output: impl Into<String>) -> SyncError {
    SyncError::ToolVersionInvalid {
        dir: dir.into(),
        output: output.into(),
    }
}
