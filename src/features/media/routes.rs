use axum::{extract::DefaultBodyLimit, routing::post, Router};
use std::sync::Arc;

use crate::features::media::dtos::{MAX_FILES_PER_UPLOAD, MAX_FILE_SIZE};
use crate::features::media::handlers::{delete_files, upload_file, upload_multiple_files};
use crate::features::media::services::MediaService;

/// Create routes for the media feature
pub fn routes(media_service: Arc<MediaService>) -> Router {
    Router::new()
        .route(
            "/v1/media/upload",
            // Allow body size up to MAX_FILE_SIZE + buffer for multipart overhead
            post(upload_file).layer(DefaultBodyLimit::max(MAX_FILE_SIZE + 1024 * 1024)),
        )
        .route(
            "/v1/media/upload-multiple",
            post(upload_multiple_files).layer(DefaultBodyLimit::max(
                MAX_FILE_SIZE * MAX_FILES_PER_UPLOAD + 1024 * 1024,
            )),
        )
        .route("/v1/media/delete", post(delete_files))
        .with_state(media_service)
}
