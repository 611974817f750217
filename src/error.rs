// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SyncError>;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// External process exited with a non-zero status.
    #[error("Command failed: {command} (exit code {code:?}): {stderr}")]
    Command {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Failed to spawn command {command}: {source}")]
    CommandSpawn {
        command: String,
        source: std::io::Error,
    },

    #[error("Failed to create directory {}: {source}", .path.display())]
    DirectoryCreate {
        path: PathBuf,
        permission_denied: bool,
        source: std::io::Error,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unsupported URL scheme for credential embedding: {0}")]
    UnsupportedScheme(String),

    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Knowledge service returned {status}: {body}")]
    RemoteStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Upload response did not contain a file id")]
    MissingFileId,

    #[error("Validation error: {0}")]
    Validation(String),
}

impl SyncError {
    pub fn is_permission_denied(&self) -> bool {
        matches!(
            self,
            SyncError::DirectoryCreate {
                permission_denied: true,
                ..
            }
        )
    }
}
