use std::sync::Arc;

use tracing::{debug, warn};

use crate::modules::cache::CacheService;

/// Cache key of the storage token; one token per process, not per user
pub const CREDENTIAL_CACHE_KEY: &str = "storage:x-auth-token";

/// Lifetime given to a freshly issued token in the cache
pub const CREDENTIAL_TTL_SECS: u64 = 3600;

/// Adapter storing the storage token in the shared cache
///
/// A token is considered valid for as long as the cache holds it. Cache
/// failures never fail a storage operation: a failed read is a miss and a
/// failed write or invalidate is only logged.
#[derive(Clone)]
pub struct CredentialCache {
    cache: Arc<dyn CacheService>,
}

impl CredentialCache {
    pub fn new(cache: Arc<dyn CacheService>) -> Self {
        Self { cache }
    }

    pub async fn get(&self) -> Option<String> {
        match self.cache.get(CREDENTIAL_CACHE_KEY).await {
            Ok(Some(token)) if !token.is_empty() => {
                debug!("Cache hit for storage token");
                Some(token)
            }
            Ok(_) => {
                debug!("Storage token not cached");
                None
            }
            Err(e) => {
                warn!("Failed to read storage token from cache, treating as miss: {}", e);
                None
            }
        }
    }

    pub async fn set(&self, token: &str, ttl_secs: u64) {
        if let Err(e) = self.cache.set(CREDENTIAL_CACHE_KEY, token, ttl_secs).await {
            warn!("Failed to cache storage token: {}", e);
        }
    }

    /// Drop every variant of the cached token
    pub async fn invalidate(&self) {
        let pattern = format!("{}*", CREDENTIAL_CACHE_KEY);
        match self.cache.del_by_pattern(&pattern).await {
            Ok(removed) => debug!("Invalidated {} cached storage token(s)", removed),
            Err(e) => warn!("Failed to invalidate cached storage token: {}", e),
        }
    }
}
