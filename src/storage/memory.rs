//! In-memory storage backend
//!
//! Hash-map backed storage, primarily for tests and for seeding small fixed
//! module sets.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use hyper::body::Bytes;

use super::{Storage, StorageError};

/// Storage over a guarded in-memory map
#[derive(Default)]
pub struct MemStorage {
    entries: RwLock<HashMap<String, Bytes>>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `content` under `key`, replacing any previous value
    pub fn insert(&self, key: impl Into<String>, content: impl Into<Bytes>) {
        self.entries
            .write()
            .unwrap()
            .insert(key.into(), content.into());
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn get(&self, key: &str) -> Result<Bytes, StorageError> {
        let normalized = key.trim_start_matches('/');
        self.entries
            .read()
            .unwrap()
            .get(normalized)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                key: key.to_string(),
            })
    }

    async fn exists(&self, key: &str) -> bool {
        let normalized = key.trim_start_matches('/');
        self.entries.read().unwrap().contains_key(normalized)
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let normalized = prefix.trim_start_matches('/').trim_end_matches('/');
        let parent = format!("{normalized}/");
        let mut keys: Vec<String> = self
            .entries
            .read()
            .unwrap()
            .keys()
            .filter(|key| {
                key.strip_prefix(&parent)
                    .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
            })
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }
}
