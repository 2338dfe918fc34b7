//! Go module proxy surface
//!
//! Maps the GOPROXY URL grammar onto storage-backed handlers through a
//! fixed, ordered route table:
//!
//! | Path | Handler | Content-Type |
//! |---|---|---|
//! | `{module}/@v/{version}.info` | download | `application/json` |
//! | `{module}/@v/{version}.mod` | download | `text/plain` |
//! | `{module}/@v/{version}.zip` | download | `application/zip` |
//! | `{module}/@v/list` | download | `text/plain` |
//! | `{module}/@latest` | latest-version lookup | `application/json` |
//! | anything else | empty 404 | (none) |
//!
//! All five proxy routes require GET; any other method falls through to the
//! 404 fallback rather than producing a 405.

mod download;
mod latest;

pub use download::Download;
pub use latest::LatestVersion;

use std::sync::Arc;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::http::request::Parts;
use hyper::{Request, Response, StatusCode};

use crate::http::{FixedStatus, Handler, Logged, WithHeaders};
use crate::routing::{Route, Router, Rule};
use crate::storage::Storage;

const INFO_PATTERN: &str = r".+/@v/v.*\.info";
const MOD_PATTERN: &str = r".+/@v/v.*\.mod";
const ZIP_PATTERN: &str = r".+/@v/v.*\.zip";
const LIST_PATTERN: &str = r".+/@v/list";
const LATEST_PATTERN: &str = r".+/@latest";

const CONTENT_TYPE_JSON: &str = "application/json";
const CONTENT_TYPE_TEXT: &str = "text/plain";
const CONTENT_TYPE_ZIP: &str = "application/zip";

/// HTTP facade implementing the Go module proxy protocol over a storage
/// backend
///
/// The route table is built once per storage instance and never mutated;
/// dispatch is stateless and safe to share across concurrent requests.
pub struct ModuleProxy {
    router: Router,
}

impl ModuleProxy {
    /// Build the proxy's route table for `storage`
    ///
    /// Routes are ordered most-specific-first; the terminal fallback answers
    /// every request nothing else claimed with an empty 404.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let router = Router::new(vec![
            download_route(INFO_PATTERN, &storage, CONTENT_TYPE_JSON),
            download_route(MOD_PATTERN, &storage, CONTENT_TYPE_TEXT),
            download_route(ZIP_PATTERN, &storage, CONTENT_TYPE_ZIP),
            download_route(LIST_PATTERN, &storage, CONTENT_TYPE_TEXT),
            Route::new(
                Rule::get_path(LATEST_PATTERN),
                Box::new(Logged::new(LatestVersion::new(Arc::clone(&storage)))),
            ),
            Route::fallback(Box::new(FixedStatus::new(StatusCode::NOT_FOUND))),
        ]);
        Self { router }
    }

    /// Handle a full request
    ///
    /// Proxy operations are nullary GETs; the body is dropped undispatched.
    pub async fn handle(&self, req: Request<Incoming>) -> Response<Full<Bytes>> {
        let (head, _body) = req.into_parts();
        self.respond(&head).await
    }

    /// Dispatch a request head against the route table
    pub async fn respond(&self, head: &Parts) -> Response<Full<Bytes>> {
        self.router.dispatch(head).await
    }
}

/// A GET route downloading by path, with the content type forced on the way
/// out regardless of what the download handler set
fn download_route(
    pattern: &str,
    storage: &Arc<dyn Storage>,
    content_type: &'static str,
) -> Route {
    Route::new(
        Rule::get_path(pattern),
        Box::new(Logged::new(WithHeaders::content_type(
            Download::new(Arc::clone(storage)),
            content_type,
        ))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemStorage;
    use http_body_util::BodyExt;
    use hyper::Method;

    const INFO_DOC: &[u8] = br#"{"Version":"v1.2.3","Time":"2024-01-02T15:04:05Z"}"#;
    const MOD_DOC: &[u8] = b"module github.com/foo/bar\n\ngo 1.22\n";
    const VERSION_LIST: &[u8] = b"v1.0.0\nv1.2.3\n";

    fn seeded_proxy() -> ModuleProxy {
        let storage = MemStorage::new();
        storage.insert("github.com/foo/bar/@v/v1.2.3.info", INFO_DOC);
        storage.insert("github.com/foo/bar/@v/v1.0.0.info", &br#"{"Version":"v1.0.0"}"#[..]);
        storage.insert("github.com/foo/bar/@v/v1.2.3.mod", MOD_DOC);
        storage.insert("github.com/foo/bar/@v/v1.2.3.zip", &b"PK\x03\x04fake"[..]);
        storage.insert("github.com/foo/bar/@v/list", VERSION_LIST);
        ModuleProxy::new(Arc::new(storage))
    }

    fn head(method: Method, path: &str) -> Parts {
        let (parts, ()) = Request::builder()
            .method(method)
            .uri(path)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    async fn body_of(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn info_is_served_as_json_with_stored_bytes() {
        let proxy = seeded_proxy();
        let resp = proxy
            .respond(&head(Method::GET, "/github.com/foo/bar/@v/v1.2.3.info"))
            .await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "application/json");
        assert_eq!(body_of(resp).await, Bytes::from_static(INFO_DOC));
    }

    #[tokio::test]
    async fn mod_is_served_as_text() {
        let proxy = seeded_proxy();
        let resp = proxy
            .respond(&head(Method::GET, "/github.com/foo/bar/@v/v1.2.3.mod"))
            .await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "text/plain");
        assert_eq!(body_of(resp).await, Bytes::from_static(MOD_DOC));
    }

    #[tokio::test]
    async fn zip_is_served_as_zip() {
        let proxy = seeded_proxy();
        let resp = proxy
            .respond(&head(Method::GET, "/github.com/foo/bar/@v/v1.2.3.zip"))
            .await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "application/zip");
    }

    #[tokio::test]
    async fn list_is_served_as_text_with_stored_bytes() {
        let proxy = seeded_proxy();
        let resp = proxy
            .respond(&head(Method::GET, "/github.com/foo/bar/@v/list"))
            .await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "text/plain");
        assert_eq!(body_of(resp).await, Bytes::from_static(VERSION_LIST));
    }

    #[tokio::test]
    async fn route_content_type_overrides_download_default() {
        // The download handler defaults to application/octet-stream; the
        // table value must win for every matched shape
        let proxy = seeded_proxy();
        let resp = proxy
            .respond(&head(Method::GET, "/github.com/foo/bar/@v/v1.2.3.info"))
            .await;
        assert_ne!(resp.headers()["Content-Type"], "application/octet-stream");
    }

    #[tokio::test]
    async fn latest_serves_newest_version_info() {
        let proxy = seeded_proxy();
        let resp = proxy
            .respond(&head(Method::GET, "/github.com/foo/bar/@latest"))
            .await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "application/json");
        assert_eq!(body_of(resp).await, Bytes::from_static(INFO_DOC));
    }

    #[tokio::test]
    async fn unknown_path_is_404_with_empty_body() {
        let proxy = seeded_proxy();
        let resp = proxy.respond(&head(Method::GET, "/unknown/path")).await;
        assert_eq!(resp.status(), 404);
        assert!(body_of(resp).await.is_empty());
    }

    #[tokio::test]
    async fn post_to_info_path_falls_through_to_404() {
        // Deliberately 404, not 405: the method is part of each rule's
        // conjunction, so a mismatch falls through to the fallback
        let proxy = seeded_proxy();
        let resp = proxy
            .respond(&head(Method::POST, "/github.com/foo/bar/@v/v1.2.3.info"))
            .await;
        assert_eq!(resp.status(), 404);
        assert!(body_of(resp).await.is_empty());
    }

    #[tokio::test]
    async fn non_get_methods_fall_through_on_every_shape() {
        let proxy = seeded_proxy();
        for path in [
            "/github.com/foo/bar/@v/v1.2.3.mod",
            "/github.com/foo/bar/@v/v1.2.3.zip",
            "/github.com/foo/bar/@v/list",
            "/github.com/foo/bar/@latest",
        ] {
            let resp = proxy.respond(&head(Method::PUT, path)).await;
            assert_eq!(resp.status(), 404, "expected fallback for PUT {path}");
        }
    }

    #[tokio::test]
    async fn missing_version_is_404() {
        let proxy = seeded_proxy();
        let resp = proxy
            .respond(&head(Method::GET, "/github.com/foo/bar/@v/v9.9.9.info"))
            .await;
        assert_eq!(resp.status(), 404);
        assert!(body_of(resp).await.is_empty());
    }

    #[tokio::test]
    async fn version_suffix_routes_stay_distinct_under_odd_nesting() {
        // A module path that embeds @latest still routes by its terminal
        // suffix, and a path ending in /@latest is never mistaken for a
        // download shape
        let storage = MemStorage::new();
        storage.insert("m/@latest/@v/v1.0.0.info", &br#"{"Version":"v1.0.0"}"#[..]);
        let proxy = ModuleProxy::new(Arc::new(storage));

        let resp = proxy
            .respond(&head(Method::GET, "/m/@latest/@v/v1.0.0.info"))
            .await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "application/json");

        // No versions stored under "m/@v/", so @latest resolves to nothing
        let resp = proxy.respond(&head(Method::GET, "/m/@latest")).await;
        assert_eq!(resp.status(), 404);
    }
}
