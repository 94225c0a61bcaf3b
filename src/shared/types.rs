use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Envelope shared by every JSON response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    /// Machine-readable error code, present on failures only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub errors: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>) -> Self {
        Self {
            success: true,
            data,
            message,
            code: None,
            errors: None,
        }
    }

    /// Failed outcome that still reports a payload (e.g. a degraded health check)
    pub fn failure(data: Option<T>, message: Option<String>) -> Self {
        Self {
            success: false,
            data,
            message,
            code: None,
            errors: None,
        }
    }

    pub fn error(
        message: Option<String>,
        code: Option<&str>,
        errors: Option<Vec<String>>,
    ) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            code: code.map(str::to_string),
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failure_keeps_data_and_omits_code() {
        let body = ApiResponse::failure(Some(json!({ "status": "degraded" })), None);
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["success"], json!(false));
        assert_eq!(value["data"]["status"], json!("degraded"));
        assert!(value.get("code").is_none());
    }

    #[test]
    fn test_error_carries_code() {
        let body = ApiResponse::<()>::error(Some("bad".to_string()), Some("INVALID_PATH"), None);
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["success"], json!(false));
        assert_eq!(value["code"], json!("INVALID_PATH"));
    }
}
