use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::health::handler::health_check;
use crate::modules::cache::CacheService;

/// Health routes (no auth required)
pub fn routes(cache: Arc<dyn CacheService>) -> Router {
    Router::new()
        .route("/v1/health", get(health_check))
        .with_state(cache)
}
