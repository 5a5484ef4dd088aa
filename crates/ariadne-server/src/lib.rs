//! # Ariadne Server
//!
//! The dispatcher and its HTTP bootstrap.
//!
//! - [`App`] - route, scope and middleware registration, and
//!   [`App::dispatch`]
//! - [`serve`] - explicit HTTP/1.1 bootstrap over hyper
//! - [`ShutdownSignal`] - graceful shutdown coordination
//!
//! ## Example
//!
//! ```rust,ignore
//! use ariadne_core::{handler_fn, Request};
//! use ariadne_server::{serve, App, ServerConfig, ShutdownSignal};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut app = App::new();
//!     app.get("/users/:id", handler_fn(|req: Request| async move {
//!         format!("user {}", req.param("id").unwrap_or_default())
//!     }))?;
//!
//!     let config = ServerConfig::builder().http_addr("0.0.0.0:8080").build();
//!     serve(app, &config, ShutdownSignal::with_os_signals()).await?;
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/ariadne-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app;
pub mod config;
mod dispatch;
mod error;
mod server;
pub mod shutdown;

pub use app::{App, Scope};
pub use config::{ServerConfig, ServerConfigBuilder};
pub use error::ServerError;
pub use server::{serve, serve_listener};
pub use shutdown::{ConnectionToken, ConnectionTracker, ShutdownSignal};
