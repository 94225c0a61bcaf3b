use reqwest::StatusCode;
use thiserror::Error;

/// Failure of the identity handshake
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("identity endpoint unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("identity endpoint returned HTTP {status}: {body}")]
    Rejected { status: StatusCode, body: String },

    #[error("identity response did not carry an x-subject-token header")]
    MissingToken,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("No file provided")]
    FileRequired,

    #[error("Failed to upload '{filename}' to storage: {detail}")]
    Upload {
        filename: String,
        status: Option<StatusCode>,
        detail: String,
    },

    #[error("Failed to delete files from storage: {detail}")]
    Delete {
        status: Option<StatusCode>,
        detail: String,
    },

    #[error("Failed to initialize storage client: {0}")]
    Client(String),
}

impl StorageError {
    pub fn invalid_path(path: &str, reason: impl Into<String>) -> Self {
        StorageError::InvalidPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code surfaced to API callers
    pub fn code(&self) -> &'static str {
        match self {
            StorageError::Auth(_) => "AUTH_FAILED",
            StorageError::InvalidPath { .. } => "INVALID_PATH",
            StorageError::FileRequired => "FILE_REQUIRED",
            StorageError::Upload { .. } => "UPLOAD_FAILED",
            StorageError::Delete { .. } => "DELETE_FAILED",
            StorageError::Client(_) => "STORAGE_UNAVAILABLE",
        }
    }
}
