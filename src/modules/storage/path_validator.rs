use reqwest::Url;

use super::error::StorageError;

/// Path segment preceding the account in Swift public URLs
const API_VERSION_SEGMENT: &str = "v1";

/// Prefix of Swift account segments (`AUTH_<project>`)
const ACCOUNT_SEGMENT_PREFIX: &str = "AUTH_";

/// Normalizes caller-supplied folders, paths and public URLs into
/// container-relative storage paths
#[derive(Debug, Clone)]
pub struct PathValidator {
    container: String,
}

impl PathValidator {
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into().trim_matches('/').to_string(),
        }
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    /// Strip leading and trailing slashes from an upload folder
    pub fn sanitize_folder(folder: &str) -> String {
        folder.trim().trim_matches('/').to_string()
    }

    /// Sanitize an upload folder and refuse relative segments
    ///
    /// `.` and `..` would be resolved by the HTTP client and move the object
    /// out of `{container}/{folder}`.
    pub fn upload_folder(folder: &str) -> Result<String, StorageError> {
        let sanitized = Self::sanitize_folder(folder);
        if sanitized.split('/').any(is_relative_segment) {
            return Err(StorageError::invalid_path(
                folder,
                "must not contain '.' or '..' segments",
            ));
        }
        Ok(sanitized)
    }

    /// Check that a filename names a single object inside its folder
    pub fn check_filename(filename: &str) -> Result<(), StorageError> {
        if filename.trim().is_empty() {
            return Err(StorageError::invalid_path(filename, "filename is empty"));
        }
        if is_relative_segment(filename) {
            return Err(StorageError::invalid_path(
                filename,
                "filename must not be '.' or '..'",
            ));
        }
        if filename.contains('/') {
            return Err(StorageError::invalid_path(
                filename,
                "filename must not contain '/'",
            ));
        }
        Ok(())
    }

    /// Reduce a path or public URL to a storage-relative path
    ///
    /// Never fails: anything that is not a parseable `http(s)` URL is taken
    /// as an already-relative path.
    pub fn normalize(&self, input: &str) -> String {
        let trimmed = input.trim();

        if looks_like_url(trimmed) {
            if let Ok(url) = Url::parse(trimmed) {
                return relative_from_url_path(url.path());
            }
        }

        trimmed.trim_start_matches('/').to_string()
    }

    /// Normalize a path for deletion and ensure it lies inside the container
    pub fn normalize_for_delete(&self, input: &str) -> Result<String, StorageError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(StorageError::invalid_path(input, "path is empty"));
        }

        if looks_like_url(trimmed) && Url::parse(trimmed).is_err() {
            return Err(StorageError::invalid_path(input, "not a valid URL"));
        }

        let normalized = self.normalize(trimmed);

        let container_prefix = format!("{}/", self.container);
        let object = normalized.strip_prefix(&container_prefix).ok_or_else(|| {
            StorageError::invalid_path(
                input,
                format!("must start with container name \"{}\"", self.container),
            )
        })?;

        if object.trim_matches('/').is_empty() {
            return Err(StorageError::invalid_path(
                input,
                "does not name an object inside the container",
            ));
        }

        if object.split('/').any(|segment| segment == "..") {
            return Err(StorageError::invalid_path(
                input,
                "must not contain '..' segments",
            ));
        }

        Ok(normalized)
    }
}

fn is_relative_segment(segment: &str) -> bool {
    matches!(segment.trim(), "." | "..")
}

fn looks_like_url(input: &str) -> bool {
    let lower = input.get(..8).unwrap_or(input).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Drop everything up to the API version segment and the account segment
/// that follows it; paths without a version segment are kept whole
fn relative_from_url_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let start = match segments.iter().position(|s| *s == API_VERSION_SEGMENT) {
        Some(idx) => {
            let after_version = idx + 1;
            match segments.get(after_version) {
                Some(segment) if segment.starts_with(ACCOUNT_SEGMENT_PREFIX) => after_version + 1,
                _ => after_version,
            }
        }
        None => 0,
    };

    segments[start..].join("/")
}
