//! First-match route dispatch
//!
//! An ordered table of (rule, handler) pairs scanned sequentially per
//! request. Tables are ordered most-specific-first and end in a fallback
//! route whose rule always matches.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::http::request::Parts;
use hyper::{Response, StatusCode};

use super::rule::Rule;
use crate::http::{self, Handler};

/// A single dispatch table entry: a rule guarding a handler
pub struct Route {
    rule: Rule,
    handler: Box<dyn Handler>,
}

impl Route {
    pub fn new(rule: Rule, handler: Box<dyn Handler>) -> Self {
        Self { rule, handler }
    }

    /// Terminal entry that matches every request
    pub fn fallback(handler: Box<dyn Handler>) -> Self {
        Self::new(Rule::Fallback, handler)
    }
}

/// Ordered route table with first-match-wins dispatch
///
/// Built once at startup and never mutated; shared read-only across
/// concurrent requests.
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// Dispatch a request head to the first matching route
    ///
    /// Tables end in a fallback route; should one be omitted and nothing
    /// match, an empty 404 keeps the one-response-per-request invariant.
    pub async fn dispatch(&self, req: &Parts) -> Response<Full<Bytes>> {
        for route in &self.routes {
            if route.rule.matches(&req.method, req.uri.path()) {
                return route.handler.handle(req).await;
            }
        }
        http::empty_status(StatusCode::NOT_FOUND)
    }
}
