//! # Ariadne Core
//!
//! Core types shared by the Ariadne router, middleware and server crates:
//!
//! - [`Request`] - Read-only request view with path, header and query accessors
//! - [`Response`] and [`IntoResponse`] - Response type and handler return conversions
//! - [`responses`] - The fixed not-found and internal-error responses
//! - [`Handler`] - Object-safe async handler trait, see [`handler_fn`]
//! - [`Environment`] - Type-keyed application state
//! - [`Error`] - Failures raised at registration or during a dispatch

#![doc(html_root_url = "https://docs.rs/ariadne-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod environment;
mod error;
mod handler;
mod id;
mod request;
mod response;

pub use environment::Environment;
pub use error::{Error, Result};
pub use handler::{handler_fn, BoxHandler, Handler, HandlerFn};
pub use id::RequestId;
pub use request::Request;
pub use response::{responses, IntoResponse, Json, Response};
