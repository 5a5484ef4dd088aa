//! # Ariadne Middleware
//!
//! Onion-model middleware composition.
//!
//! Every dispatch runs an ordered chain of path-matched middleware around
//! exactly one terminal [`Endpoint`]:
//!
//! ```text
//! ┌──────────── a ────────────┐
//! │ ┌────────── b ──────────┐ │
//! │ │     ┌──────────┐      │ │
//! │ │ ──▶ │ endpoint │ ──▶  │ │
//! │ │     └──────────┘      │ │
//! │ └───────────────────────┘ │
//! └───────────────────────────┘
//!   a-before, b-before, endpoint, b-after, a-after
//! ```
//!
//! - [`Middleware`] / [`from_fn`] - the `(ctx, next)` middleware shape
//! - [`Next`] - single-use continuation for the remainder of the chain
//! - [`compose`] - builds a fresh chain per dispatch
//! - [`Context`] - per-dispatch request view, environment and response slot
//! - [`MiddlewareRegistry`] - path-scoped middleware registrations

#![doc(html_root_url = "https://docs.rs/ariadne-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod compose;
mod context;
mod endpoint;
mod middleware;
mod registry;

pub use compose::{compose, names, BoxedMiddleware};
pub use context::Context;
pub use endpoint::Endpoint;
pub use futures_util::future::BoxFuture;
pub use middleware::{from_fn, FnMiddleware, Middleware, Next};
pub use registry::MiddlewareRegistry;
