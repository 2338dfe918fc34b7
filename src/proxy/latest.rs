//! Latest-version resolution for `{module}/@latest`
//!
//! Lists the module's `@v/` prefix, picks the newest version among the
//! stored `.info` keys, and serves that version's info document verbatim.
//! Storage stays the single source of truth; nothing is synthesized.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::http::request::Parts;
use hyper::{Response, StatusCode};

use crate::http::{self, Handler};
use crate::logger;
use crate::storage::{Storage, StorageError};

/// Resolves `{module}/@latest` to the newest stored version's info document
pub struct LatestVersion {
    storage: Arc<dyn Storage>,
}

impl LatestVersion {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl Handler for LatestVersion {
    async fn handle(&self, req: &Parts) -> Response<Full<Bytes>> {
        let path = req.uri.path().trim_start_matches('/');
        let Some(module) = path.strip_suffix("/@latest") else {
            return http::empty_status(StatusCode::NOT_FOUND);
        };

        let prefix = format!("{module}/@v/");
        let keys = match self.storage.list(&prefix).await {
            Ok(keys) => keys,
            Err(StorageError::NotFound { .. } | StorageError::InvalidKey { .. }) => {
                return http::empty_status(StatusCode::NOT_FOUND);
            }
            Err(e) => {
                logger::log_error(&format!("Listing '{prefix}' failed: {e}"));
                return http::empty_status(StatusCode::INTERNAL_SERVER_ERROR);
            }
        };

        let Some(version) = newest_version(&keys) else {
            return http::empty_status(StatusCode::NOT_FOUND);
        };

        let info_key = format!("{module}/@v/{version}.info");
        match self.storage.get(&info_key).await {
            Ok(content) => http::bytes_response(content, "application/json"),
            Err(StorageError::NotFound { .. }) => http::empty_status(StatusCode::NOT_FOUND),
            Err(e) => {
                logger::log_error(&format!("Download of '{info_key}' failed: {e}"));
                http::empty_status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

/// Pick the newest version among the `.info` keys of a module listing
fn newest_version(keys: &[String]) -> Option<String> {
    keys.iter()
        .filter_map(|key| key.rsplit('/').next())
        .filter_map(|name| name.strip_suffix(".info"))
        .max_by(|a, b| compare_versions(a, b))
        .map(ToString::to_string)
}

/// Order two version strings
///
/// Dot segments compare numerically when both sides are numeric and
/// lexicographically otherwise; a release outranks its own pre-releases
/// (`v1.0.0` > `v1.0.0-rc1`); with equal shared segments, more segments win
/// (`v1.0.1` > `v1.0`).
fn compare_versions(a: &str, b: &str) -> Ordering {
    let (a_base, a_pre) = split_pre_release(a.trim_start_matches('v'));
    let (b_base, b_pre) = split_pre_release(b.trim_start_matches('v'));

    let base = compare_segments(a_base, b_base);
    if base != Ordering::Equal {
        return base;
    }

    match (a_pre, b_pre) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => x.cmp(y),
    }
}

/// Split "1.0.0-rc1" into the base version and the pre-release tag
fn split_pre_release(version: &str) -> (&str, Option<&str>) {
    match version.split_once('-') {
        Some((base, pre)) => (base, Some(pre)),
        None => (version, None),
    }
}

fn compare_segments(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (x.parse::<u64>(), y.parse::<u64>()) {
                    (Ok(m), Ok(n)) => m.cmp(&n),
                    _ => x.cmp(y),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}
