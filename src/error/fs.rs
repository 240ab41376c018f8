//! File system errors

use std::path::Path;

use super::SyncError;

/// Creates a file not found error
pub fn not_found(path: impl Into<String>) -> SyncError {
    SyncError::FileNotFound { path: path.into() }
}

/// Creates a file read failed error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> SyncError {
    SyncError::FileReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a file write failed error
pub fn write_failed(path: impl Into<String>, reason: impl Into<String>) -> SyncError {
    SyncError::FileWriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a file remove failed error
pub fn remove_failed(path: impl Into<String>, reason: impl Into<String>) -> SyncError {
    SyncError::FileRemoveFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an IO error
pub fn io_error(message: impl Into<String>) -> SyncError {
    SyncError::IoError {
        message: message.into(),
    }
}

pub(crate) fn read_error(path: &Path, e: &std::io::Error) -> SyncError {
    read_failed(path.display().to_string(), e.to_string())
}

pub(crate) fn write_error(path: &Path, e: &std::io::Error) -> SyncError {
    write_failed(path.display().to_string(), e.to_string())
}

pub(crate) fn remove_error(path: &Path, e: &std::io::Error) -> SyncError {
    remove_failed(path.display().to_string(), e.to_string())
}
