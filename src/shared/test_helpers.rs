#[cfg(test)]
use crate::modules::cache::{CacheError, CacheService};

#[cfg(test)]
use async_trait::async_trait;

#[cfg(test)]
use std::collections::HashMap;

#[cfg(test)]
use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(test)]
use std::sync::Mutex;

/// Operation recorded by [`InMemoryCache`]
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheOp {
    Get(String),
    Set { key: String, ttl_secs: u64 },
    Del(String),
    DelByPattern(String),
    Reset,
}

/// In-process cache that records every call, for asserting cache traffic
#[cfg(test)]
#[derive(Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, (String, u64)>>,
    ops: Mutex<Vec<CacheOp>>,
    failing: AtomicBool,
}

#[cfg(test)]
#[allow(dead_code)]
impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate an entry without recording an operation
    pub fn with_entry(self, key: &str, value: &str, ttl_secs: u64) -> Self {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), ttl_secs));
        self
    }

    /// Make every subsequent call fail with a connection error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn ops(&self) -> Vec<CacheOp> {
        self.ops.lock().unwrap().clone()
    }

    pub fn sets(&self) -> Vec<CacheOp> {
        self.ops()
            .into_iter()
            .filter(|op| matches!(op, CacheOp::Set { .. }))
            .collect()
    }

    pub fn pattern_deletes(&self) -> usize {
        self.ops()
            .iter()
            .filter(|op| matches!(op, CacheOp::DelByPattern(_)))
            .count()
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap()
            .get(key)
            .map(|(value, _)| value.clone())
    }

    pub fn ttl(&self, key: &str) -> Option<u64> {
        self.entries.lock().unwrap().get(key).map(|(_, ttl)| *ttl)
    }

    fn record(&self, op: CacheOp) -> Result<(), CacheError> {
        self.ops.lock().unwrap().push(op);
        if self.failing.load(Ordering::SeqCst) {
            return Err(CacheError::ConnectionFailed("cache offline".to_string()));
        }
        Ok(())
    }
}

/// Minimal glob support: exact match or a trailing `*`
#[cfg(test)]
fn glob_matches(pattern: &str, key: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => key.starts_with(prefix),
        None => pattern == key,
    }
}

#[cfg(test)]
#[async_trait]
impl CacheService for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.record(CacheOp::Get(key.to_string()))?;
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), CacheError> {
        self.record(CacheOp::Set {
            key: key.to_string(),
            ttl_secs,
        })?;
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), ttl_secs));
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<bool, CacheError> {
        self.record(CacheOp::Del(key.to_string()))?;
        Ok(self.entries.lock().unwrap().remove(key).is_some())
    }

    async fn del_by_pattern(&self, pattern: &str) -> Result<u64, CacheError> {
        self.record(CacheOp::DelByPattern(pattern.to_string()))?;
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|key, _| !glob_matches(pattern, key));
        Ok((before - entries.len()) as u64)
    }

    async fn reset(&self) -> Result<u64, CacheError> {
        self.record(CacheOp::Reset)?;
        let mut entries = self.entries.lock().unwrap();
        let removed = entries.len() as u64;
        entries.clear();
        Ok(removed)
    }

    async fn ping(&self) -> Result<(), CacheError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CacheError::ConnectionFailed("cache offline".to_string()));
        }
        Ok(())
    }
}
