//! Stored-content download handler
//!
//! Serves storage bytes verbatim, keyed by the request path. The route
//! table overrides the content type per URL shape; this handler only
//! supplies the generic default.

use std::sync::Arc;

use async_trait::async_trait;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::http::request::Parts;
use hyper::{Response, StatusCode};

use crate::http::{self, Handler};
use crate::logger;
use crate::storage::{Storage, StorageError};

/// Content type when no route-level override applies
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Downloads the content stored under the request path
pub struct Download {
    storage: Arc<dyn Storage>,
}

impl Download {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }
}

/// Derive the storage key from a request path
pub(crate) fn key_from_path(path: &str) -> &str {
    path.trim_start_matches('/')
}

#[async_trait]
impl Handler for Download {
    async fn handle(&self, req: &Parts) -> Response<Full<Bytes>> {
        let key = key_from_path(req.uri.path());
        match self.storage.get(key).await {
            Ok(content) => http::bytes_response(content, DEFAULT_CONTENT_TYPE),
            Err(StorageError::NotFound { .. } | StorageError::InvalidKey { .. }) => {
                http::empty_status(StatusCode::NOT_FOUND)
            }
            Err(e) => {
                logger::log_error(&format!("Download of '{key}' failed: {e}"));
                http::empty_status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemStorage;
    use http_body_util::BodyExt;
    use hyper::{Method, Request};

    fn head(path: &str) -> Parts {
        let (parts, ()) = Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[tokio::test]
    async fn serves_stored_bytes_with_default_type() {
        let storage = MemStorage::new();
        storage.insert("m/@v/v1.0.0.zip", &b"zipbytes"[..]);
        let handler = Download::new(Arc::new(storage));

        let resp = handler.handle(&head("/m/@v/v1.0.0.zip")).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "application/octet-stream");

        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, Bytes::from_static(b"zipbytes"));
    }

    #[tokio::test]
    async fn missing_key_is_empty_404() {
        let handler = Download::new(Arc::new(MemStorage::new()));

        let resp = handler.handle(&head("/m/@v/v1.0.0.info")).await;
        assert_eq!(resp.status(), 404);

        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[test]
    fn key_strips_leading_slash_only() {
        assert_eq!(key_from_path("/m/@v/list"), "m/@v/list");
        assert_eq!(key_from_path("m/@v/list"), "m/@v/list");
    }
}
