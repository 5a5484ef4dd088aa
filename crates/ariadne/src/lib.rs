//! # Ariadne
//!
//! **A trie-based HTTP router with onion-model middleware**
//!
//! - **Backtracking route trie** – static segments, `:params`, `:id{regex}`
//!   constraints and trailing `*` wildcards
//! - **Onion middleware** – path-scoped middleware wraps the handler, with
//!   code before and after `next.run(ctx)`
//! - **Single failure boundary** – handler errors and panics become one
//!   fixed `500` response, unmatched paths one fixed `404`
//! - **Explicit bootstrap** – nothing listens until you call [`run`] or
//!   [`server::serve`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ariadne::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::new()
//!         .with_optional_file("ariadne.toml")?
//!         .with_env_prefix("ARIADNE")
//!         .load()?;
//!
//!     let mut app = ariadne::app(&config);
//!     app.use_fn("/*", "timing", |ctx, next| Box::pin(async move {
//!         next.run(ctx).await?;
//!         tracing::info!(elapsed_ms = ctx.elapsed().as_millis() as u64, "handled");
//!         Ok(())
//!     }))?;
//!     app.get("/users/:id", handler_fn(|req: Request| async move {
//!         format!("user {}", req.param("id").unwrap_or_default())
//!     }))?;
//!
//!     ariadne::run(app, &config, ShutdownSignal::with_os_signals()).await
//! }
//! ```
//!
//! ## Request flow
//!
//! ```text
//! Request → mw(/*) → mw(/users/:id) → Handler
//!                                        ↓
//! Response ← mw(/*) ← mw(/users/:id) ←───┘
//! ```

#![doc(html_root_url = "https://docs.rs/ariadne/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use anyhow::Context as _;

// Re-export the route index
pub use ariadne_router as router;

// Re-export core types
pub use ariadne_core as core;

// Re-export middleware types
pub use ariadne_middleware as middleware;

// Re-export the dispatcher and bootstrap
pub use ariadne_server as server;

// Re-export configuration
pub use ariadne_config as config;

// Re-export observability
pub use ariadne_telemetry as telemetry;

use ariadne_config::AriadneConfig;
use ariadne_server::{App, ServerConfig, ShutdownSignal};

/// Creates an empty [`App`] with the routing options from `config`.
///
/// Equivalent to [`App::strict`] with `routing.strict`.
#[must_use]
pub fn app(config: &AriadneConfig) -> App {
    App::strict(config.routing.strict)
}

/// Initializes telemetry from `config`, then serves `app` until `shutdown`
/// fires.
///
/// # Errors
///
/// Returns an error if telemetry cannot be initialized or the server
/// cannot bind its address.
pub async fn run(app: App, config: &AriadneConfig, shutdown: ShutdownSignal) -> anyhow::Result<()> {
    ariadne_telemetry::init_telemetry(&config.telemetry.to_telemetry_config())
        .context("failed to initialize telemetry")?;

    let server_config = ServerConfig::from(&config.server);
    tracing::info!(
        http_addr = server_config.http_addr(),
        strict = app.is_strict(),
        "starting ariadne"
    );

    ariadne_server::serve(app, &server_config, shutdown)
        .await
        .context("server failed")
}

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use ariadne::prelude::*;
/// ```
pub mod prelude {
    pub use ariadne_core::{handler_fn, Error, Handler, IntoResponse, Json, Request, Response};

    pub use ariadne_middleware::{from_fn, BoxFuture, Context, Middleware, Next};

    pub use ariadne_router::{MethodKey, Params};

    pub use ariadne_server::{serve, App, Scope, ServerConfig, ShutdownSignal};

    pub use ariadne_config::{AriadneConfig, ConfigLoader};
}
