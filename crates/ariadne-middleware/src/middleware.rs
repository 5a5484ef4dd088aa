//! Core middleware trait and continuation type.
//!
//! Middleware wraps the rest of the chain. It receives the per-dispatch
//! [`Context`] and a [`Next`] continuation; code before `next.run(ctx)`
//! runs on the way in, code after it runs on the way out. Not calling
//! `next` short-circuits everything inside.
//!
//! # Example
//!
//! ```
//! use ariadne_middleware::{from_fn, Middleware};
//!
//! let timing = from_fn("timing", |ctx, next| {
//!     Box::pin(async move {
//!         let result = next.run(ctx).await;
//!         tracing::debug!(elapsed_ms = ctx.elapsed().as_millis() as u64, "request finished");
//!         result
//!     })
//! });
//! assert_eq!(timing.name(), "timing");
//! ```

use ariadne_core::Error;
use futures_util::future::BoxFuture;

use crate::context::Context;

/// Path-scoped middleware.
///
/// # Invariants
///
/// - `next` is consumed by `run`, so the rest of the chain runs at most once
/// - Errors from downstream should be propagated with `?`, not swallowed;
///   the dispatcher translates them into the internal-error response
pub trait Middleware: Send + Sync + 'static {
    /// Returns the name of this middleware, used in logs.
    fn name(&self) -> &'static str;

    /// Processes the request, optionally continuing with `next`.
    fn handle<'a>(
        &'a self,
        ctx: &'a mut Context,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<(), Error>>;
}

/// Continuation that runs the remainder of the chain.
///
/// A fresh chain of continuations is built for each dispatch, so no
/// cursor is ever shared between requests.
pub struct Next<'a> {
    inner: NextInner<'a>,
}

enum NextInner<'a> {
    /// More middleware to run.
    Chain {
        middleware: &'a dyn Middleware,
        next: Box<Next<'a>>,
    },
    /// Past the terminal entry; running it does nothing.
    End,
}

impl<'a> Next<'a> {
    /// Creates a continuation that invokes `middleware` with `next`.
    pub(crate) fn new(middleware: &'a dyn Middleware, next: Next<'a>) -> Self {
        Self {
            inner: NextInner::Chain {
                middleware,
                next: Box::new(next),
            },
        }
    }

    /// Creates the no-op continuation handed to the terminal entry.
    #[must_use]
    pub fn end() -> Self {
        Self {
            inner: NextInner::End,
        }
    }

    /// Returns true if running this continuation does nothing.
    #[must_use]
    pub fn is_end(&self) -> bool {
        matches!(self.inner, NextInner::End)
    }

    /// Runs the next entry in the chain and everything nested under it.
    ///
    /// This consumes `self` so the remainder can only run once.
    pub async fn run(self, ctx: &mut Context) -> Result<(), Error> {
        match self.inner {
            NextInner::Chain { middleware, next } => {
                tracing::trace!(middleware = middleware.name(), "entering middleware");
                middleware.handle(ctx, *next).await
            }
            NextInner::End => Ok(()),
        }
    }
}

impl std::fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            NextInner::Chain { middleware, .. } => f
                .debug_struct("Next")
                .field("middleware", &middleware.name())
                .finish_non_exhaustive(),
            NextInner::End => f.write_str("Next::End"),
        }
    }
}

/// A middleware built from a closure.
///
/// Created by [`from_fn`].
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> std::fmt::Debug for FnMiddleware<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnMiddleware")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Builds middleware from an async closure `(ctx, next)`.
///
/// This is the only closure constructor: the bound admits exactly the
/// two-argument asynchronous shape, so anything else is rejected when the
/// application is compiled rather than when a request arrives.
pub fn from_fn<F>(name: &'static str, func: F) -> FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut Context, Next<'a>) -> BoxFuture<'a, Result<(), Error>>
        + Send
        + Sync
        + 'static,
{
    FnMiddleware { name, func }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut Context, Next<'a>) -> BoxFuture<'a, Result<(), Error>>
        + Send
        + Sync
        + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn handle<'a>(
        &'a self,
        ctx: &'a mut Context,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<(), Error>> {
        (self.func)(ctx, next)
    }
}
