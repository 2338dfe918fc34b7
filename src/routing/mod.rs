//! Ordered predicate routing
//!
//! Routes pair a matching [`Rule`] with a handler; a [`Router`] scans its
//! table in order and dispatches to the first match.

mod router;
mod rule;

pub use router::{Route, Router};
pub use rule::Rule;
