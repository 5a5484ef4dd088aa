//! Response type and conversions.
//!
//! Handlers may return anything implementing [`IntoResponse`]. The
//! conversion is fallible: a value that cannot become a valid response
//! (for example a body that fails to serialize) is reported as
//! [`Error::InvalidResponse`] and handled at the dispatch boundary like
//! any other failure.

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use http::StatusCode;
use http_body_util::Full;
use serde::Serialize;

use crate::error::Error;

/// HTTP response type used throughout Ariadne.
pub type Response = http::Response<Full<Bytes>>;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const APPLICATION_JSON: &str = "application/json";

/// Builders for the fixed responses the dispatcher produces itself.
pub mod responses {
    use super::{fixed, Response};
    use http::StatusCode;

    /// Body of the built-in not-found response.
    pub const NOT_FOUND_BODY: &str = "Not Found";

    /// Body of the built-in internal-error response.
    pub const INTERNAL_ERROR_BODY: &str = "Internal Server Error";

    /// `404 Not Found` with a plain-text body and exact content length.
    #[must_use]
    pub fn not_found() -> Response {
        fixed(StatusCode::NOT_FOUND, NOT_FOUND_BODY)
    }

    /// `500 Internal Server Error` with a plain-text body and exact
    /// content length.
    #[must_use]
    pub fn internal_error() -> Response {
        fixed(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY)
    }
}

/// Builds a plain-text response with an explicit `content-length`.
fn fixed(status: StatusCode, body: &'static str) -> Response {
    let mut response = with_content_type(Bytes::from_static(body.as_bytes()), TEXT_PLAIN);
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
    response
}

fn with_content_type(body: Bytes, content_type: &'static str) -> Response {
    let mut response = Response::new(Full::new(body));
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

/// Conversion of handler return values into a [`Response`].
pub trait IntoResponse {
    /// Converts `self` into a response.
    fn into_response(self) -> Result<Response, Error>;
}

impl IntoResponse for Response {
    fn into_response(self) -> Result<Response, Error> {
        Ok(self)
    }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Result<Response, Error> {
        Ok(with_content_type(Bytes::from_static(self.as_bytes()), TEXT_PLAIN))
    }
}

impl IntoResponse for String {
    fn into_response(self) -> Result<Response, Error> {
        Ok(with_content_type(Bytes::from(self), TEXT_PLAIN))
    }
}

impl IntoResponse for Bytes {
    fn into_response(self) -> Result<Response, Error> {
        Ok(with_content_type(self, "application/octet-stream"))
    }
}

impl IntoResponse for StatusCode {
    fn into_response(self) -> Result<Response, Error> {
        let mut response = Response::new(Full::new(Bytes::new()));
        *response.status_mut() = self;
        Ok(response)
    }
}

impl IntoResponse for () {
    fn into_response(self) -> Result<Response, Error> {
        StatusCode::NO_CONTENT.into_response()
    }
}

impl<T: IntoResponse> IntoResponse for (StatusCode, T) {
    fn into_response(self) -> Result<Response, Error> {
        let (status, inner) = self;
        let mut response = inner.into_response()?;
        *response.status_mut() = status;
        Ok(response)
    }
}

impl<T, E> IntoResponse for Result<T, E>
where
    T: IntoResponse,
    E: Into<Error>,
{
    fn into_response(self) -> Result<Response, Error> {
        self.map_err(Into::into)?.into_response()
    }
}

/// A JSON response body.
///
/// # Example
///
/// ```
/// use ariadne_core::{IntoResponse, Json};
///
/// let response = Json(serde_json::json!({"id": 42})).into_response().unwrap();
/// assert_eq!(response.headers()["content-type"], "application/json");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Result<Response, Error> {
        let body = serde_json::to_vec(&self.0)?;
        Ok(with_content_type(Bytes::from(body), APPLICATION_JSON))
    }
}
