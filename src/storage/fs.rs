//! Filesystem storage backend
//!
//! Each key maps to a file under a root directory. Keys are validated
//! before touching the filesystem so a crafted request path cannot escape
//! the root.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use hyper::body::Bytes;
use tokio::fs;

use super::{Storage, StorageError};

/// Storage rooted at a directory on the local filesystem
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a key to a path under the root, rejecting traversal segments
    fn resolve(&self, key: &str) -> Result<PathBuf, StorageError> {
        let normalized = key.trim_start_matches('/');
        if normalized.is_empty() || normalized.split('/').any(|segment| segment == "..") {
            return Err(StorageError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.root.join(normalized))
    }
}

#[async_trait]
impl Storage for FsStorage {
    async fn get(&self, key: &str) -> Result<Bytes, StorageError> {
        let path = self.resolve(key)?;
        match fs::read(&path).await {
            Ok(content) => Ok(Bytes::from(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound {
                key: key.to_string(),
            }),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn exists(&self, key: &str) -> bool {
        match self.resolve(key) {
            Ok(path) => fs::metadata(&path)
                .await
                .map(|meta| meta.is_file())
                .unwrap_or(false),
            Err(_) => false,
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let dir = self.resolve(prefix)?;
        let normalized = prefix.trim_start_matches('/').trim_end_matches('/');

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::Io(e)),
        };

        let mut keys = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                if let Some(name) = entry.file_name().to_str() {
                    keys.push(format!("{normalized}/{name}"));
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Per-test scratch directory under the system temp dir
    fn temp_root(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gomod-proxy-fs-{}-{tag}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_file(root: &PathBuf, key: &str, content: &[u8]) {
        let path = root.join(key);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[tokio::test]
    async fn get_returns_stored_bytes() {
        let root = temp_root("get");
        write_file(&root, "m/@v/v1.0.0.mod", b"module m\n");
        let storage = FsStorage::new(root.clone());

        let content = storage.get("m/@v/v1.0.0.mod").await.unwrap();
        assert_eq!(content, Bytes::from_static(b"module m\n"));

        std::fs::remove_dir_all(root).unwrap();
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let root = temp_root("missing");
        let storage = FsStorage::new(root.clone());

        let err = storage.get("m/@v/v0.0.1.zip").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));

        std::fs::remove_dir_all(root).unwrap();
    }

    #[tokio::test]
    async fn traversal_segments_are_rejected() {
        let root = temp_root("traversal");
        let storage = FsStorage::new(root.clone());

        let err = storage.get("../../etc/passwd").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey { .. }));
        let err = storage.get("m/@v/../../../secret").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey { .. }));
        assert!(!storage.exists("../outside").await);

        std::fs::remove_dir_all(root).unwrap();
    }

    #[tokio::test]
    async fn empty_key_is_rejected() {
        let root = temp_root("empty");
        let storage = FsStorage::new(root.clone());

        let err = storage.get("/").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey { .. }));

        std::fs::remove_dir_all(root).unwrap();
    }

    #[tokio::test]
    async fn list_returns_sorted_direct_children() {
        let root = temp_root("list");
        write_file(&root, "m/@v/v1.1.0.info", b"{}");
        write_file(&root, "m/@v/v1.0.0.info", b"{}");
        write_file(&root, "m/@v/list", b"v1.0.0\nv1.1.0\n");
        let storage = FsStorage::new(root.clone());

        let keys = storage.list("m/@v/").await.unwrap();
        assert_eq!(keys, vec!["m/@v/list", "m/@v/v1.0.0.info", "m/@v/v1.1.0.info"]);

        std::fs::remove_dir_all(root).unwrap();
    }

    #[tokio::test]
    async fn listing_missing_prefix_is_empty() {
        let root = temp_root("list-missing");
        let storage = FsStorage::new(root.clone());

        let keys = storage.list("nothing/@v/").await.unwrap();
        assert!(keys.is_empty());

        std::fs::remove_dir_all(root).unwrap();
    }
}
