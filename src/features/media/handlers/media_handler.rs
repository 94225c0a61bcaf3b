use axum::{
    extract::{multipart::Field, Multipart, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;
use validator::Validate;

use crate::core::error::AppError;
use crate::core::extractor::AppJson;
use crate::features::media::dtos::{
    DeleteFilesDto, DeleteFilesResponseDto, UploadFileDto, UploadFileResponseDto,
    UploadMultipleFilesDto, UploadMultipleFilesResponseDto, DEFAULT_CONTENT_TYPE, MAX_FILE_SIZE,
    MAX_FILES_PER_UPLOAD,
};
use crate::features::media::services::MediaService;
use crate::modules::storage::{StorageError, UploadRequest};
use crate::shared::types::ApiResponse;

/// Read one file part into an upload request
async fn read_file_field(field: Field<'_>) -> Result<UploadRequest, AppError> {
    let content_type = field
        .content_type()
        .map(|s| s.to_string())
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

    let filename = field
        .file_name()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "unnamed".to_string());

    let data = field.bytes().await.map_err(|e| {
        debug!("Failed to read file bytes: {}", e);
        AppError::InvalidInput(format!("Failed to read file data: {}", e))
    })?;

    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::InvalidInput(format!(
            "File \"{}\" too large. Maximum size is {} bytes ({} MB)",
            filename,
            MAX_FILE_SIZE,
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    Ok(UploadRequest::new(filename, content_type, data))
}

async fn read_text_field(field: Field<'_>, name: &str) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read {} field: {}", name, e)))
}

/// Upload a single file
///
/// Accepts multipart/form-data with:
/// - `file`: The file to upload (required)
/// - `path`: Destination folder inside the container (required)
#[utoipa::path(
    post,
    path = "/v1/media/upload",
    tag = "media",
    request_body(
        content = UploadFileDto,
        content_type = "multipart/form-data",
        description = "File plus the destination folder",
    ),
    responses(
        (status = 201, description = "File uploaded successfully", body = ApiResponse<UploadFileResponseDto>),
        (status = 400, description = "Missing file or path"),
        (status = 502, description = "Object storage rejected the upload")
    )
)]
pub async fn upload_file(
    State(service): State<Arc<MediaService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<UploadFileResponseDto>>), AppError> {
    let mut file: Option<UploadRequest> = None;
    let mut path: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::InvalidInput(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => file = Some(read_file_field(field).await?),
            "path" => path = Some(read_text_field(field, "path").await?),
            _ => debug!("Ignoring unknown field: {}", field_name),
        }
    }

    let file = file.ok_or(StorageError::FileRequired)?;
    let path = path.unwrap_or_default();

    let response = service.upload_file(&path, file).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(response),
            Some("Upload successful".to_string()),
        )),
    ))
}

/// Upload several files into one folder
///
/// Files are stored sequentially. If any upload fails, files already stored
/// by the request are removed and an error is returned.
#[utoipa::path(
    post,
    path = "/v1/media/upload-multiple",
    tag = "media",
    request_body(
        content = UploadMultipleFilesDto,
        content_type = "multipart/form-data",
        description = "Files (repeated `files` parts) plus the destination folder",
    ),
    responses(
        (status = 201, description = "Files uploaded successfully", body = ApiResponse<UploadMultipleFilesResponseDto>),
        (status = 400, description = "Missing files, too many files or missing path"),
        (status = 502, description = "Object storage rejected one of the uploads")
    )
)]
pub async fn upload_multiple_files(
    State(service): State<Arc<MediaService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<UploadMultipleFilesResponseDto>>), AppError> {
    let mut files: Vec<UploadRequest> = Vec::new();
    let mut path: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::InvalidInput(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "files" | "files[]" | "file" => {
                if files.len() == MAX_FILES_PER_UPLOAD {
                    return Err(AppError::InvalidInput(format!(
                        "Too many files. Maximum is {} per request",
                        MAX_FILES_PER_UPLOAD
                    )));
                }
                files.push(read_file_field(field).await?);
            }
            "path" => path = Some(read_text_field(field, "path").await?),
            _ => debug!("Ignoring unknown field: {}", field_name),
        }
    }

    let path = path.unwrap_or_default();

    let response = service.upload_multiple_files(&path, files).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(response),
            Some("Upload successful".to_string()),
        )),
    ))
}

/// Delete files by public URL or container path
#[utoipa::path(
    post,
    path = "/v1/media/delete",
    tag = "media",
    request_body = DeleteFilesDto,
    responses(
        (status = 200, description = "Files deleted successfully", body = ApiResponse<DeleteFilesResponseDto>),
        (status = 400, description = "Empty list or a path outside the container"),
        (status = 502, description = "Object storage rejected the deletion")
    )
)]
pub async fn delete_files(
    State(service): State<Arc<MediaService>>,
    AppJson(dto): AppJson<DeleteFilesDto>,
) -> Result<Json<ApiResponse<DeleteFilesResponseDto>>, AppError> {
    dto.validate()
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;

    let response = service.delete_files(dto.files).await?;
    let message = response.message.clone();

    Ok(Json(ApiResponse::success(Some(response), Some(message))))
}

#[cfg(test)]
mod tests {
    use crate::core::config::StorageConfig;
    use crate::features::media::{routes, MediaService};
    use crate::modules::storage::{ObjectStorageGateway, CREDENTIAL_CACHE_KEY};
    use crate::shared::test_helpers::InMemoryCache;
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_server(storage: &MockServer) -> TestServer {
        let config = StorageConfig {
            auth_url: format!("{}/v3/auth/tokens", storage.uri()),
            base_url: format!("{}/v1/AUTH_proj/cdn/", storage.uri()),
            username: "swift-user".to_string(),
            password: "swift-pass".to_string(),
            project_id: "proj-123".to_string(),
            container: "cdn".to_string(),
            request_timeout: Duration::from_secs(5),
        };
        let cache = Arc::new(InMemoryCache::new().with_entry(CREDENTIAL_CACHE_KEY, "tok", 3600));
        let gateway = Arc::new(ObjectStorageGateway::new(&config, cache).unwrap());

        TestServer::new(routes(Arc::new(MediaService::new(gateway)))).unwrap()
    }

    #[tokio::test]
    async fn test_upload_file_route() {
        let storage = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/v1/AUTH_proj/cdn/blog/a.png"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&storage)
            .await;

        let server = test_server(&storage);
        let form = MultipartForm::new().add_text("path", "/blog").add_part(
            "file",
            Part::bytes(vec![0x89, 0x50, 0x4e, 0x47])
                .file_name("a.png")
                .mime_type("image/png"),
        );

        let response = server.post("/v1/media/upload").multipart(form).await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["success"], json!(true));
        assert_eq!(
            body["data"]["url"],
            json!(format!("{}/v1/AUTH_proj/cdn/blog/a.png", storage.uri()))
        );
    }

    #[tokio::test]
    async fn test_upload_file_route_without_file() {
        let storage = MockServer::start().await;
        let server = test_server(&storage);

        let form = MultipartForm::new().add_text("path", "blog");
        let response = server.post("/v1/media/upload").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["code"], json!("FILE_REQUIRED"));
    }

    #[tokio::test]
    async fn test_upload_multiple_route() {
        let storage = MockServer::start().await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(201))
            .expect(2)
            .mount(&storage)
            .await;

        let server = test_server(&storage);
        let form = MultipartForm::new()
            .add_text("path", "gallery")
            .add_part(
                "files",
                Part::bytes(vec![1, 2, 3]).file_name("a.jpg").mime_type("image/jpeg"),
            )
            .add_part(
                "files",
                Part::bytes(vec![4, 5, 6]).file_name("b.jpg").mime_type("image/jpeg"),
            );

        let response = server.post("/v1/media/upload-multiple").multipart(form).await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        let urls = body["data"]["urls"].as_array().unwrap();
        assert_eq!(urls.len(), 2);
        assert!(urls[1].as_str().unwrap().ends_with("/cdn/gallery/b.jpg"));
    }

    #[tokio::test]
    async fn test_delete_route_rejects_empty_list() {
        let storage = MockServer::start().await;
        let server = test_server(&storage);

        let response = server
            .post("/v1/media/delete")
            .json(&json!({ "files": [] }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["code"], json!("INVALID_INPUT"));
    }

    #[tokio::test]
    async fn test_delete_route_rejects_foreign_container() {
        let storage = MockServer::start().await;
        let server = test_server(&storage);

        let response = server
            .post("/v1/media/delete")
            .json(&json!({ "files": ["https://host/v1/other/img.png"] }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["code"], json!("INVALID_PATH"));
        assert!(storage.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_route_success() {
        let storage = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/AUTH_proj/cdn/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&storage)
            .await;

        let server = test_server(&storage);

        let response = server
            .post("/v1/media/delete")
            .json(&json!({ "files": ["https://host/v1/cdn/blog/img.png"] }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["message"], json!("Files deleted successfully"));
        assert_eq!(body["data"]["deleted"], json!(["cdn/blog/img.png"]));
    }
}
