use utoipa::{Modify, OpenApi};

use crate::features::health::{dto as health_dto, handler as health_handler};
use crate::features::media::{dtos as media_dtos, handlers as media_handlers};
use crate::shared::types::ApiResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Media
        media_handlers::upload_file,
        media_handlers::upload_multiple_files,
        media_handlers::delete_files,
        // Health
        health_handler::health_check,
    ),
    components(
        schemas(
            // Media
            media_dtos::UploadFileDto,
            media_dtos::UploadMultipleFilesDto,
            media_dtos::UploadFileResponseDto,
            media_dtos::UploadMultipleFilesResponseDto,
            media_dtos::DeleteFilesDto,
            media_dtos::DeleteFilesResponseDto,
            ApiResponse<media_dtos::UploadFileResponseDto>,
            ApiResponse<media_dtos::UploadMultipleFilesResponseDto>,
            ApiResponse<media_dtos::DeleteFilesResponseDto>,
            // Health
            health_dto::ComponentStatus,
            health_dto::HealthResponseDto,
            ApiResponse<health_dto::HealthResponseDto>,
        )
    ),
    tags(
        (name = "media", description = "Upload and delete files in object storage"),
        (name = "health", description = "Service health"),
    ),
    info(
        title = "CMS Media Gateway API",
        version = "0.1.0",
        description = "API documentation for the CMS media gateway",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
