//! Typed configuration for Ariadne.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (unknown fields are rejected)
//! - Layered loading (defaults → file → env)
//!
//! The root type is [`AriadneConfig`]:
//!
//! - [`ServerSection`] - bind address and shutdown timeout
//! - [`RoutingSection`] - trailing-slash strictness
//! - [`TelemetrySection`] - logging and metrics
//!
//! # Example
//!
//! ```no_run
//! use ariadne_config::ConfigLoader;
//!
//! # fn main() -> Result<(), ariadne_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_optional_file("ariadne.toml")?
//!     .with_env_prefix("ARIADNE")
//!     .load()?;
//!
//! println!("listening on {}", config.server.http_addr);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! http_addr = "0.0.0.0:8080"
//! shutdown_timeout_secs = 30
//!
//! [routing]
//! strict = false
//!
//! [telemetry.logging]
//! enabled = true
//! level = "info"
//! format = "json"
//!
//! [telemetry.metrics]
//! enabled = true
//! addr = "0.0.0.0:9090"
//! ```
//!
//! # Environment Variable Overrides
//!
//! - `ARIADNE__SERVER__HTTP_ADDR=0.0.0.0:9000`
//! - `ARIADNE__ROUTING__STRICT=true`
//! - `ARIADNE__TELEMETRY__METRICS__ENABLED=false`

#![doc(html_root_url = "https://docs.rs/ariadne-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{AriadneConfig, AriadneConfigBuilder};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{
    LogFormat, LoggingSection, MetricsSection, RoutingSection, ServerSection, TelemetrySection,
};
