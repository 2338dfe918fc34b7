//! Route matching rules
//!
//! A rule is a boolean condition over a request's method and path. Rules
//! compose by conjunction; a route matches only when every sub-condition
//! holds, so a path that fits a pattern under the wrong method does not
//! match and falls through to later routes.

use hyper::Method;
use regex::Regex;

/// A single matching condition, or a conjunction of them
#[derive(Debug)]
pub enum Rule {
    /// Anchored regular-expression match over the request path
    Path(Regex),
    /// Exact request-method match
    Method(Method),
    /// Conjunction: every sub-rule must hold
    All(Vec<Rule>),
    /// Tautology, used by the terminal fallback route
    Fallback,
}

impl Rule {
    /// Compile an anchored path pattern
    ///
    /// # Panics
    ///
    /// Panics if the pattern is not a valid regular expression. Route tables
    /// are built from fixed patterns at startup (construction-time invariant).
    pub fn path(pattern: &str) -> Self {
        let anchored = format!("^{pattern}$");
        Self::Path(Regex::new(&anchored).expect("invalid route path pattern"))
    }

    /// Path pattern restricted to GET requests
    pub fn get_path(pattern: &str) -> Self {
        Self::All(vec![Self::path(pattern), Self::Method(Method::GET)])
    }

    /// Check whether this rule accepts the given method and path
    pub fn matches(&self, method: &Method, path: &str) -> bool {
        match self {
            Self::Path(re) => re.is_match(path),
            Self::Method(m) => m == method,
            Self::All(rules) => rules.iter().all(|r| r.matches(method, path)),
            Self::Fallback => true,
        }
    }
}
