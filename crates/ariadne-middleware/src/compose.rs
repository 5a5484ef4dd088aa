//! Chain composition.
//!
//! [`compose`] turns an ordered list of middleware into a single [`Next`]
//! continuation. The last entry is the terminal one and receives the no-op
//! continuation, so for `[a, b, endpoint]` the observed order is
//! `a-before, b-before, endpoint, b-after, a-after`.

use std::sync::Arc;

use crate::middleware::{Middleware, Next};

/// A type-erased middleware that can be stored in a vector.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// Builds the continuation chain for `entries`, outermost first.
///
/// The chain borrows `entries` and is meant to be built fresh for every
/// dispatch. An empty slice yields the no-op continuation.
#[must_use]
pub fn compose(entries: &[BoxedMiddleware]) -> Next<'_> {
    entries
        .iter()
        .rev()
        .fold(Next::end(), |next, middleware| Next::new(middleware.as_ref(), next))
}

/// Returns the names of `entries` in chain order.
#[must_use]
pub fn names(entries: &[BoxedMiddleware]) -> Vec<&'static str> {
    entries.iter().map(|m| m.name()).collect()
}
