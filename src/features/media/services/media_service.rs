use std::sync::Arc;
use tracing::info;

use crate::core::error::{AppError, Result};
use crate::features::media::dtos::{
    DeleteFilesResponseDto, UploadFileResponseDto, UploadMultipleFilesResponseDto,
};
use crate::modules::storage::{ObjectStorageGateway, UploadRequest};

/// Service exposing media upload and deletion to the API layer
pub struct MediaService {
    gateway: Arc<ObjectStorageGateway>,
}

impl MediaService {
    pub fn new(gateway: Arc<ObjectStorageGateway>) -> Self {
        Self { gateway }
    }

    fn require_path(path: &str) -> Result<()> {
        if path.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Missing \"path\" in request".to_string(),
            ));
        }
        Ok(())
    }

    /// Upload one file into `path`
    pub async fn upload_file(&self, path: &str, file: UploadRequest) -> Result<UploadFileResponseDto> {
        Self::require_path(path)?;

        let url = self.gateway.upload_one(path, &file).await?;

        info!(
            "Media uploaded: filename={}, content_type={}, size={}",
            file.filename,
            file.content_type,
            file.data.len()
        );

        Ok(UploadFileResponseDto { url })
    }

    /// Upload several files into `path`, all or nothing
    pub async fn upload_multiple_files(
        &self,
        path: &str,
        files: Vec<UploadRequest>,
    ) -> Result<UploadMultipleFilesResponseDto> {
        Self::require_path(path)?;

        let urls = self.gateway.upload_many(path, &files).await?;

        info!("Media batch uploaded: count={}", urls.len());

        Ok(UploadMultipleFilesResponseDto { urls })
    }

    /// Delete files given as public URLs or container paths
    pub async fn delete_files(&self, files: Vec<String>) -> Result<DeleteFilesResponseDto> {
        let deleted = self.gateway.bulk_delete(&files).await?;

        Ok(DeleteFilesResponseDto {
            message: "Files deleted successfully".to_string(),
            deleted,
        })
    }
}
