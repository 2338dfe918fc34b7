//! Artifact storage abstraction
//!
//! Byte content keyed by slash-separated identifiers (the request path with
//! its leading slash stripped). The proxy only ever reads; backends decide
//! where the bytes live.

mod fs;
mod memory;

pub use fs::FsStorage;
pub use memory::MemStorage;

use async_trait::async_trait;
use hyper::body::Bytes;
use thiserror::Error;

/// Storage-layer errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// No content stored under the key
    #[error("key not found: {key}")]
    NotFound { key: String },

    /// Key rejected before any lookup (empty, or contains traversal segments)
    #[error("invalid key: {key}")]
    InvalidKey { key: String },

    /// Underlying I/O failure
    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read-only byte-content storage
#[async_trait]
pub trait Storage: Send + Sync {
    /// Fetch the content stored under `key`
    async fn get(&self, key: &str) -> Result<Bytes, StorageError>;

    /// Whether `key` currently holds content
    async fn exists(&self, key: &str) -> bool;

    /// List keys that are direct children of `prefix`
    ///
    /// Module version files live flat under `{module}/@v/`, so one level is
    /// all the proxy ever needs. A missing prefix lists as empty, not as an
    /// error.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}
