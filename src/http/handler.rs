//! Request handler abstraction and decorators
//!
//! A [`Handler`] turns a request head into a full response. Handlers only
//! see the head: the proxy's operations are nullary GETs and the transport
//! layer drops request bodies before dispatch. Decorators wrap an inner
//! handler to add a fixed concern (header overrides, access logging)
//! without changing its contract.

use std::time::Instant;

use async_trait::async_trait;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderName, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::http::request::Parts;
use hyper::{Response, StatusCode, Version};

use crate::http::response;
use crate::logger::{self, AccessLogEntry};

/// Asynchronous request processor: one request head in, one response out
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, req: &Parts) -> Response<Full<Bytes>>;
}

/// Responds to every request with a fixed status and an empty body
pub struct FixedStatus {
    status: StatusCode,
}

impl FixedStatus {
    pub const fn new(status: StatusCode) -> Self {
        Self { status }
    }
}

#[async_trait]
impl Handler for FixedStatus {
    async fn handle(&self, _req: &Parts) -> Response<Full<Bytes>> {
        response::empty_status(self.status)
    }
}

/// Calls the inner handler, then inserts the configured headers into the
/// response, overwriting anything the inner handler set for those names.
/// Status and body pass through untouched.
pub struct WithHeaders<H> {
    inner: H,
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl<H: Handler> WithHeaders<H> {
    pub fn new(inner: H, headers: Vec<(HeaderName, HeaderValue)>) -> Self {
        Self { inner, headers }
    }

    /// Convenience wrapper forcing a single `Content-Type` value
    pub fn content_type(inner: H, value: &'static str) -> Self {
        Self::new(inner, vec![(CONTENT_TYPE, HeaderValue::from_static(value))])
    }
}

#[async_trait]
impl<H: Handler> Handler for WithHeaders<H> {
    async fn handle(&self, req: &Parts) -> Response<Full<Bytes>> {
        let mut resp = self.inner.handle(req).await;
        for (name, value) in &self.headers {
            resp.headers_mut().insert(name.clone(), value.clone());
        }
        resp
    }
}

/// Records the request line before delegating and an access-log entry after
/// the inner handler returns. Purely observational: the inner handler's
/// response is returned unchanged, and log sink failures are swallowed.
pub struct Logged<H> {
    inner: H,
}

impl<H: Handler> Logged<H> {
    pub const fn new(inner: H) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<H: Handler> Handler for Logged<H> {
    async fn handle(&self, req: &Parts) -> Response<Full<Bytes>> {
        let started = Instant::now();
        logger::log_request(&req.method, &req.uri, req.version);

        let resp = self.inner.handle(req).await;

        let mut entry = AccessLogEntry::new(req.method.to_string(), req.uri.path().to_string());
        entry.http_version = version_label(req.version);
        entry.status = resp.status().as_u16();
        entry.body_bytes = content_length(&resp);
        entry.duration_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry);

        resp
    }
}

/// Version label for access log lines (the "1.1" in "HTTP/1.1")
fn version_label(version: Version) -> String {
    if version == Version::HTTP_10 {
        "1.0".to_string()
    } else if version == Version::HTTP_11 {
        "1.1".to_string()
    } else if version == Version::HTTP_2 {
        "2".to_string()
    } else {
        format!("{version:?}")
    }
}

/// Response body size as advertised by Content-Length (0 if unset)
fn content_length(resp: &Response<Full<Bytes>>) -> usize {
    resp.headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}
