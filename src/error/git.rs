//! Git operation errors

use super::SyncError;

/// Creates a clone failed error
pub fn clone_failed(url: impl Into<String>, reason: impl Into<String>) -> SyncError {
    SyncError::GitCloneFailed {
        url: url.into(),
        reason: reason.into(),
    }
}

/// Creates a pull failed error for an existing checkout
pub fn pull_failed(path: impl Into<String>, reason: impl Into<String>) -> SyncError {
    SyncError::GitPullFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
