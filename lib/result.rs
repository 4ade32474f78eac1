use std::path::PathBuf;

use thiserror::Error;

use crate::sources::github::GithubError;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("processed releases in '{0}' could not be loaded")]
    StateUnavailable(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("GitHub error: {0}")]
    GitHub(#[from] GithubError),
}

pub type SyncResult<T> = Result<T, SyncError>;
