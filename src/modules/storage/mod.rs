//! Storage module for media objects
//!
//! Talks to a token-authenticated object store (Keystone identity, Swift
//! objects): password handshake, cached credential, PUT uploads and bulk
//! deletes with one-shot recovery from credential expiry.

mod credential_cache;
mod error;
mod object_storage;
mod path_validator;
mod token_provider;

pub use error::StorageError;
pub use object_storage::{ObjectStorageGateway, UploadRequest};

#[cfg(test)]
pub use credential_cache::CREDENTIAL_CACHE_KEY;
#[cfg(test)]
pub use error::AuthError;
