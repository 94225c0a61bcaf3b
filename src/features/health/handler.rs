use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tracing::warn;

use crate::features::health::dto::{ComponentStatus, HealthResponseDto};
use crate::modules::cache::CacheService;
use crate::shared::types::ApiResponse;

/// Report whether the credential cache is reachable
#[utoipa::path(
    get,
    path = "/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service and cache are healthy", body = ApiResponse<HealthResponseDto>),
        (status = 503, description = "Cache is unreachable", body = ApiResponse<HealthResponseDto>)
    )
)]
pub async fn health_check(
    State(cache): State<Arc<dyn CacheService>>,
) -> (StatusCode, Json<ApiResponse<HealthResponseDto>>) {
    match cache.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                Some(HealthResponseDto {
                    status: "ok".to_string(),
                    cache: ComponentStatus::Up,
                }),
                None,
            )),
        ),
        Err(e) => {
            warn!("Health check: cache ping failed: {}", e);
            let body = ApiResponse::failure(
                Some(HealthResponseDto {
                    status: "degraded".to_string(),
                    cache: ComponentStatus::Down,
                }),
                Some("Cache is unreachable".to_string()),
            );
            (StatusCode::SERVICE_UNAVAILABLE, Json(body))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::features::health::routes;
    use crate::modules::cache::CacheService;
    use crate::shared::test_helpers::InMemoryCache;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_health_ok() {
        let cache: Arc<dyn CacheService> = Arc::new(InMemoryCache::new());
        let server = TestServer::new(routes(cache)).unwrap();

        let response = server.get("/v1/health").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["status"], json!("ok"));
        assert_eq!(body["data"]["cache"], json!("up"));
    }

    #[tokio::test]
    async fn test_health_degraded_when_cache_down() {
        let cache = Arc::new(InMemoryCache::new());
        cache.set_failing(true);
        let server = TestServer::new(routes(cache)).unwrap();

        let response = server.get("/v1/health").await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = response.json();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["data"]["status"], json!("degraded"));
        assert_eq!(body["data"]["cache"], json!("down"));
    }
}
