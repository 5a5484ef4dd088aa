//! The request view handed to middleware and handlers.
//!
//! A [`Request`] owns the inbound request together with the parameters
//! captured by the route lookup. It is read-only and cheap to clone, so
//! the same value can be passed down the chain and into the handler.

use std::sync::Arc;

use ariadne_router::Params;
use bytes::Bytes;
use http::{HeaderMap, Method, Uri};

#[derive(Debug)]
struct Inner {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    params: Params,
}

/// A dispatched request with its captured path parameters.
///
/// # Example
///
/// ```
/// use ariadne_core::Request;
/// use ariadne_router::Params;
/// use bytes::Bytes;
///
/// let raw = http::Request::builder()
///     .uri("/users/42?fields=name%2Cemail")
///     .header("x-tenant", "acme")
///     .body(Bytes::new())
///     .unwrap();
///
/// let mut params = Params::new();
/// params.push("id", "42");
///
/// let req = Request::from_http(raw, params);
/// assert_eq!(req.param("id"), Some("42"));
/// assert_eq!(req.header("x-tenant"), Some("acme"));
/// assert_eq!(req.query("fields").as_deref(), Some("name,email"));
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    inner: Arc<Inner>,
}

impl Request {
    /// Builds the view from a raw request and the lookup's captures.
    #[must_use]
    pub fn from_http(request: http::Request<Bytes>, params: Params) -> Self {
        let (parts, body) = request.into_parts();
        Self {
            inner: Arc::new(Inner {
                method: parts.method,
                uri: parts.uri,
                headers: parts.headers,
                body,
                params,
            }),
        }
    }

    /// Returns the request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.inner.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.inner.uri
    }

    /// Returns the URI path, without the query string.
    #[must_use]
    pub fn path(&self) -> &str {
        self.inner.uri.path()
    }

    /// Returns all request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.inner.headers
    }

    /// Returns a header value if it is present and valid visible ASCII.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers.get(name)?.to_str().ok()
    }

    /// Returns the path parameter captured under `name`.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.inner.params.get(name)
    }

    /// Returns all captured path parameters.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.inner.params
    }

    /// Returns the first percent-decoded query value for `key`.
    #[must_use]
    pub fn query(&self, key: &str) -> Option<String> {
        self.query_pairs()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Returns every percent-decoded query pair, in order.
    ///
    /// A malformed query string yields no pairs.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.inner
            .uri
            .query()
            .and_then(|q| serde_urlencoded::from_str(q).ok())
            .unwrap_or_default()
    }

    /// Returns the collected request body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.inner.body
    }
}
