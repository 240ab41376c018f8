//! Manifest and configuration document errors

use super::SyncError;

/// Creates an invalid manifest error
pub fn manifest_invalid(path: impl Into<String>, message: impl Into<String>) -> SyncError {
    SyncError::ManifestInvalid {
        path: path.into(),
        message: message.into(),
    }
}

/// Creates a config parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> SyncError {
    SyncError::ConfigParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid config error
pub fn invalid(path: impl Into<String>, message: impl Into<String>) -> SyncError {
    SyncError::ConfigInvalid {
        path: path.into(),
        message: message.into(),
    }
}
