//! Segment trie router for Ariadne.
//!
//! This crate indexes `(method, path-pattern)` registrations in a trie
//! whose nodes carry typed child edges, and resolves incoming paths to the
//! most specific registration with a full backtracking search.
//!
//! # Features
//!
//! - **Path Parameters**: `/users/:id` binds `id` to one non-empty segment
//! - **Constraints**: `/users/:id{\d+}` only accepts segments matching the regex
//! - **Wildcards**: `/files/*` binds the remainder of the path under `*`
//! - **Any-Method Key**: routes registered under `ALL` serve every method
//! - **Strictness**: trailing `/` is ignored unless the router is strict
//!
//! # Example
//!
//! ```rust
//! use ariadne_router::Router;
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.add("GET", "/users", "listUsers").unwrap();
//! router.add("GET", "/users/:id", "getUser").unwrap();
//! router.add("GET", "/users/me", "getCurrentUser").unwrap();
//! router.add("GET", "/files/*", "serveFile").unwrap();
//!
//! let m = router.match_route(&Method::GET, "/users/me").unwrap();
//! assert_eq!(*m.handler(), "getCurrentUser");
//!
//! let m = router.match_route(&Method::GET, "/files/a/b.txt").unwrap();
//! assert_eq!(m.params.get("*"), Some("a/b.txt"));
//! ```
//!
//! # Architecture
//!
//! ```text
//!                    (root)
//!                      │
//!              ┌───────┴───────┐
//!              │               │
//!            "users"        "files"
//!              │               │
//!        ┌─────┼─────┐         *
//!        │     │     │       [GET]
//!     (leaf)  "me"  :id
//!     [GET]  [GET]  [GET]
//! ```

mod error;
mod method;
mod node;
mod params;
mod pattern;
mod router;

pub use error::RouteError;
pub use method::MethodKey;
pub use node::Node;
pub use params::Params;
pub use pattern::{parse as parse_pattern, Constraint, Segment, PARAM_MARKER, WILDCARD_MARKER, WILDCARD_PARAM};
pub use router::Router;

/// A successful lookup: the handlers registered at the matched route and
/// the captured path parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a, H> {
    handler: &'a H,
    handlers: &'a [H],
    /// Extracted path parameters.
    pub params: Params,
}

impl<'a, H> RouteMatch<'a, H> {
    /// Creates a route match, or `None` when `handlers` is empty.
    #[must_use]
    pub fn new(handlers: &'a [H], params: Params) -> Option<Self> {
        let handler = handlers.first()?;
        Some(Self {
            handler,
            handlers,
            params,
        })
    }

    /// The first registered handler, which is the one dispatch invokes.
    #[must_use]
    pub fn handler(&self) -> &'a H {
        self.handler
    }

    /// Every handler registered at the route, in registration order.
    #[must_use]
    pub fn handlers(&self) -> &'a [H] {
        self.handlers
    }
}
