use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::modules::storage::StorageError;
use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AppError {
    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::Storage(e) => e.code(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message, errors) = match self {
            AppError::InvalidInput(ref msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Storage(ref e) => match e {
                StorageError::InvalidPath { .. } | StorageError::FileRequired => {
                    (StatusCode::BAD_REQUEST, e.to_string(), None)
                }
                StorageError::Auth(_) => {
                    tracing::error!("Storage authentication error: {}", e);
                    (
                        StatusCode::BAD_GATEWAY,
                        "Could not authenticate with object storage".to_string(),
                        None,
                    )
                }
                StorageError::Upload {
                    filename, status, ..
                } => {
                    tracing::error!("Storage upload error (status: {:?}): {}", status, e);
                    (
                        StatusCode::BAD_GATEWAY,
                        format!("Failed to upload file \"{}\" to storage", filename),
                        Some(vec![e.to_string()]),
                    )
                }
                StorageError::Delete { status, .. } => {
                    tracing::error!("Storage delete error (status: {:?}): {}", status, e);
                    (
                        StatusCode::BAD_GATEWAY,
                        "Failed to delete files from storage".to_string(),
                        Some(vec![e.to_string()]),
                    )
                }
                StorageError::Client(_) => {
                    tracing::error!("Storage client error: {}", e);
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "Object storage is unavailable".to_string(),
                        None,
                    )
                }
            },
        };

        let body = Json(ApiResponse::<()>::error(Some(message), Some(code), errors));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::storage::AuthError;
    use reqwest::StatusCode as RemoteStatus;

    #[test]
    fn test_storage_error_codes() {
        let upload = AppError::from(StorageError::Upload {
            filename: "a.png".to_string(),
            status: Some(RemoteStatus::UNAUTHORIZED),
            detail: "Unauthorized".to_string(),
        });
        assert_eq!(upload.code(), "UPLOAD_FAILED");
        assert_eq!(upload.into_response().status(), StatusCode::BAD_GATEWAY);

        let invalid = AppError::from(StorageError::invalid_path("x", "outside container"));
        assert_eq!(invalid.code(), "INVALID_PATH");
        assert_eq!(invalid.into_response().status(), StatusCode::BAD_REQUEST);

        let missing = AppError::from(StorageError::FileRequired);
        assert_eq!(missing.code(), "FILE_REQUIRED");
    }

    #[test]
    fn test_invalid_input_is_bad_request() {
        let err = AppError::InvalidInput("files must be a non-empty array".into());
        assert_eq!(err.code(), "INVALID_INPUT");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_auth_failure_is_bad_gateway() {
        let err = AppError::from(StorageError::Auth(AuthError::MissingToken));
        assert_eq!(err.code(), "AUTH_FAILED");
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
