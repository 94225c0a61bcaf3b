//! Cache module
//!
//! Generic key/value cache with TTL and pattern delete, backed by Redis.

mod redis_cache;

pub use redis_cache::{CacheError, CacheService, RedisCacheService};
