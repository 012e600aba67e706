//! HTTP response types.
//!
//! This module provides the [`HttpResponse`] descriptor produced by a
//! [`Transport`](crate::transport::Transport) or by a request interceptor that
//! answers a request directly.

use std::time::{Duration, SystemTime};

use serde::de::DeserializeOwned;

use crate::clients::headers::Headers;
use crate::retry::parse_retry_after;

/// An HTTP response.
///
/// The body is kept as the raw text returned by the server; use
/// [`json`](Self::json) to deserialize it.
///
/// # Example
///
/// ```rust
/// use http_interceptors::{Headers, HttpResponse};
///
/// let mut headers = Headers::new();
/// headers.insert("Retry-After", "900");
/// let response = HttpResponse::new(429, headers, "");
///
/// assert!(!response.is_ok());
/// assert_eq!(response.retry_after().unwrap().as_secs(), 900);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers.
    pub headers: Headers,
    /// The raw response body.
    pub body: String,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`.
    #[must_use]
    pub fn new(code: u16, headers: Headers, body: impl Into<String>) -> Self {
        Self {
            code,
            headers,
            body: body.into(),
        }
    }

    /// Returns `true` if the status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Deserializes the body as JSON.
    ///
    /// An empty body is treated as JSON `null`.
    ///
    /// # Errors
    ///
    /// Returns the [`serde_json::Error`] if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        if self.body.trim().is_empty() {
            return serde_json::from_str("null");
        }
        serde_json::from_str(&self.body)
    }

    /// Returns the request ID from the `X-Request-Id` header.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.headers.get("x-request-id")
    }

    /// Returns the wait requested by the `Retry-After` header, if present and valid.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        parse_retry_after(&self.headers, SystemTime::now())
    }
}
