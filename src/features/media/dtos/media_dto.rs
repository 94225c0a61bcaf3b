use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Upload file request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadFileDto {
    /// The file to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
    /// Destination folder inside the container
    #[schema(example = "blog/covers")]
    pub path: String,
}

/// Multiple file upload request DTO for OpenAPI documentation
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadMultipleFilesDto {
    /// Files to upload (binary parts named `files`), stored in the given order
    pub files: Vec<String>,
    /// Destination folder inside the container
    #[schema(example = "projects/gallery")]
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadFileResponseDto {
    /// Public URL of the stored object
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadMultipleFilesResponseDto {
    /// Public URLs of the stored objects, in upload order
    pub urls: Vec<String>,
}

/// Request DTO for deleting stored files
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DeleteFilesDto {
    /// Public URLs or container-relative paths (e.g. `cdn/blog/a.png`)
    #[validate(length(
        min = 1,
        max = 1000,
        message = "files must be a non-empty array of URLs or relative paths"
    ))]
    pub files: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteFilesResponseDto {
    pub message: String,
    /// Container-relative paths that were deleted
    pub deleted: Vec<String>,
}

/// Maximum size of a single uploaded file in bytes (10MB)
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Maximum number of files accepted by one multiple upload
pub const MAX_FILES_PER_UPLOAD: usize = 20;

/// Content type used when the client does not send one
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
