//! Modules layer - Infrastructure components for external integrations
//!
//! Contains clients and adapters for external services like the shared cache
//! and object storage.

pub mod cache;
pub mod storage;
