//! The terminal chain entry.

use ariadne_core::{BoxHandler, Error};
use futures_util::future::BoxFuture;

use crate::context::Context;
use crate::middleware::{Middleware, Next};

/// Wraps the matched handler (or the not-found handler) as the last entry
/// of a chain.
///
/// It calls the handler with the request, stores the response in the
/// context, then runs its continuation, which is always the no-op end of
/// the chain. A handler error aborts the chain and propagates outwards.
#[derive(Clone)]
pub struct Endpoint {
    handler: BoxHandler,
}

impl Endpoint {
    /// Creates an endpoint for `handler`.
    #[must_use]
    pub fn new(handler: BoxHandler) -> Self {
        Self { handler }
    }

    /// Returns the wrapped handler.
    #[must_use]
    pub fn handler(&self) -> &BoxHandler {
        &self.handler
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint").finish_non_exhaustive()
    }
}

impl Middleware for Endpoint {
    fn name(&self) -> &'static str {
        "endpoint"
    }

    fn handle<'a>(
        &'a self,
        ctx: &'a mut Context,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<(), Error>> {
        Box::pin(async move {
            let response = self.handler.call(ctx.request().clone()).await?;
            ctx.set_response(response);
            next.run(ctx).await
        })
    }
}
