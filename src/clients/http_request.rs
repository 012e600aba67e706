//! HTTP request types.
//!
//! This module provides the [`HttpRequest`] descriptor and its builder. A
//! request is owned by exactly one in-flight call; interceptors receive it by
//! value, may mutate it, and hand it on.

use std::collections::BTreeMap;
use std::fmt;

use crate::clients::errors::InvalidHttpRequestError;
use crate::clients::headers::{check_header, Headers};
use crate::clients::http_response::HttpResponse;
use crate::config::BaseUrl;

/// HTTP methods supported by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for replacing resources.
    Put,
    /// HTTP PATCH method for partial updates.
    Patch,
    /// HTTP DELETE method for removing resources.
    Delete,
    /// HTTP HEAD method for fetching headers only.
    Head,
}

impl HttpMethod {
    /// Returns the method token as sent on the wire (`"GET"`, `"POST"`, ...).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
        }
    }

    /// Returns `true` for methods that must carry a body.
    #[must_use]
    pub const fn requires_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Put => write!(f, "put"),
            Self::Patch => write!(f, "patch"),
            Self::Delete => write!(f, "delete"),
            Self::Head => write!(f, "head"),
        }
    }
}

/// Content type for HTTP request bodies.
///
/// Specifies the format of the request body and sets the appropriate
/// `Content-Type` header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataType {
    /// JSON content type (`application/json`).
    Json,
    /// Plain text content type (`text/plain`).
    Text,
}

impl DataType {
    /// Returns the MIME type string for this data type.
    #[must_use]
    pub const fn as_content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Text => "text/plain; charset=utf-8",
        }
    }
}

/// An HTTP request descriptor.
///
/// Use [`HttpRequest::builder`] to construct requests. The `url` may be an
/// absolute `http(s)` URL or a path that is joined to the client's base URL
/// when the request leaves the interceptor chain.
///
/// The attempt counter is assigned by the client: it starts at 0 and is
/// incremented once per retry of the same logical request.
///
/// # Example
///
/// ```rust
/// use http_interceptors::{DataType, HttpMethod, HttpRequest};
/// use serde_json::json;
///
/// let get_request = HttpRequest::builder(HttpMethod::Get, "/react-store-products")
///     .build()
///     .unwrap();
///
/// let post_request = HttpRequest::builder(HttpMethod::Post, "/products")
///     .body(json!({"product": {"title": "New Product"}}))
///     .body_type(DataType::Json)
///     .build()
///     .unwrap();
///
/// assert_eq!(get_request.attempt(), 0);
/// assert!(post_request.body.is_some());
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// Target URL, absolute or relative to the client's base URL.
    pub url: String,
    /// Request headers.
    pub headers: Headers,
    /// The request body, if any.
    pub body: Option<serde_json::Value>,
    /// The content type of the body.
    pub body_type: Option<DataType>,
    /// Query parameters to append to the URL.
    pub query: Option<BTreeMap<String, String>>,
    attempt: u32,
    prepared_response: Option<Box<HttpResponse>>,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, url: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, url)
    }

    /// Returns the zero-based attempt counter of this request.
    #[must_use]
    pub const fn attempt(&self) -> u32 {
        self.attempt
    }

    pub(crate) fn next_attempt(&mut self) {
        self.attempt = self.attempt.saturating_add(1);
    }

    pub(crate) fn reset_attempt(&mut self) {
        self.attempt = 0;
    }

    /// Answers this request with `response` instead of calling the transport.
    ///
    /// Intended for request interceptors that serve cached or synthetic
    /// responses. The response still goes through status classification and
    /// the response interceptor chain.
    #[must_use]
    pub fn respond_with(mut self, response: HttpResponse) -> Self {
        self.prepared_response = Some(Box::new(response));
        self
    }

    /// Returns the prepared response attached by [`respond_with`](Self::respond_with).
    #[must_use]
    pub fn prepared_response(&self) -> Option<&HttpResponse> {
        self.prepared_response.as_deref()
    }

    /// Returns the body encoded as it will be sent.
    ///
    /// JSON bodies are serialized; a text body that holds a JSON
    /// string is sent without surrounding quotes.
    #[must_use]
    pub fn encoded_body(&self) -> Option<String> {
        let body = self.body.as_ref()?;
        match (self.body_type, body) {
            (Some(DataType::Text), serde_json::Value::String(text)) => {
                Some(text.clone())
            }
            _ => Some(body.to_string()),
        }
    }

    /// Validates the request, ensuring it meets all requirements.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if:
    /// - `body` is `Some` but `body_type` is `None`
    /// - `http_method` is `Post`, `Put` or `Patch` but `body` is `None`
    /// - `url` is empty
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if self.url.trim().is_empty() {
            return Err(InvalidHttpRequestError::InvalidUrl {
                url: self.url.clone(),
            });
        }

        if self.body.is_some() && self.body_type.is_none() {
            return Err(InvalidHttpRequestError::MissingBodyType);
        }

        if self.http_method.requires_body() && self.body.is_none() {
            return Err(InvalidHttpRequestError::MissingBody {
                method: self.http_method.to_string(),
            });
        }

        Ok(())
    }

    /// Resolves the absolute URL of this request, including the query string.
    ///
    /// Absolute `http(s)` URLs are used as-is; anything else is joined to
    /// `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError::InvalidUrl`] if the URL is relative
    /// and no base URL is configured.
    pub fn resolve_url(&self, base_url: Option<&BaseUrl>) -> Result<String, InvalidHttpRequestError> {
        let mut url = if is_absolute(&self.url) {
            self.url.clone()
        } else {
            let base = base_url.ok_or_else(|| InvalidHttpRequestError::InvalidUrl {
                url: self.url.clone(),
            })?;
            base.join(&self.url)
        };

        if let Some(query) = self.query.as_ref().filter(|q| !q.is_empty()) {
            let encoded = query
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&encoded);
        }

        Ok(url)
    }

    /// Prepares the request for sending: resolves the URL against `base_url`,
    /// sets the `Content-Type` header from `body_type` when absent, and checks
    /// that every header can be sent.
    pub(crate) fn finalize(&mut self, base_url: Option<&BaseUrl>) -> Result<(), InvalidHttpRequestError> {
        self.verify()?;
        self.url = self.resolve_url(base_url)?;
        self.query = None;
        if let Some(body_type) = self.body_type {
            if !self.headers.contains("content-type") {
                self.headers
                    .insert("Content-Type", body_type.as_content_type());
            }
        }
        if let Some((name, _)) = self
            .headers
            .iter()
            .find(|(name, value)| check_header(name, value).is_err())
        {
            return Err(InvalidHttpRequestError::InvalidHeader {
                name: name.to_string(),
            });
        }
        Ok(())
    }
}

fn is_absolute(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Builder for constructing [`HttpRequest`] instances.
///
/// Provides a fluent API for building requests with optional parameters.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    url: String,
    headers: Headers,
    body: Option<serde_json::Value>,
    body_type: Option<DataType>,
    query: Option<BTreeMap<String, String>>,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            http_method: method,
            url: url.into(),
            headers: Headers::new(),
            body: None,
            body_type: None,
            query: None,
        }
    }

    /// Sets the request body.
    ///
    /// When setting a body, you must also set the body type via [`body_type`](Self::body_type).
    #[must_use]
    pub fn body(mut self, body: impl Into<serde_json::Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the content type of the request body.
    #[must_use]
    pub const fn body_type(mut self, body_type: DataType) -> Self {
        self.body_type = Some(body_type);
        self
    }

    /// Adds a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Sets all headers at once, replacing any added so far.
    #[must_use]
    pub fn headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    /// Adds a single header.
    #[must_use]
    pub fn header(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the request fails validation.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        let request = HttpRequest {
            http_method: self.http_method,
            url: self.url,
            headers: self.headers,
            body: self.body,
            body_type: self.body_type,
            query: self.query,
            attempt: 0,
            prepared_response: None,
        };
        request.verify()?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> BaseUrl {
        BaseUrl::new("https://course-api.com").unwrap()
    }

    #[test]
    fn test_http_method_display_and_wire_token() {
        assert_eq!(HttpMethod::Get.to_string(), "get");
        assert_eq!(HttpMethod::Patch.to_string(), "patch");
        assert_eq!(HttpMethod::Delete.as_str(), "DELETE");
        assert_eq!(HttpMethod::Head.as_str(), "HEAD");
    }

    #[test]
    fn test_builder_creates_valid_get_request() {
        let request = HttpRequest::builder(HttpMethod::Get, "/react-store-products")
            .build()
            .unwrap();

        assert_eq!(request.http_method, HttpMethod::Get);
        assert_eq!(request.url, "/react-store-products");
        assert!(request.body.is_none());
        assert_eq!(request.attempt(), 0);
        assert!(request.prepared_response().is_none());
    }

    #[test]
    fn test_verify_requires_body_for_patch() {
        let result = HttpRequest::builder(HttpMethod::Patch, "/items/1").build();

        assert!(matches!(
            result,
            Err(InvalidHttpRequestError::MissingBody { method }) if method == "patch"
        ));
    }

    #[test]
    fn test_verify_requires_body_type_when_body_present() {
        let result = HttpRequest::builder(HttpMethod::Get, "/items")
            .body(json!({"key": "value"}))
            .build();

        assert!(matches!(result, Err(InvalidHttpRequestError::MissingBodyType)));
    }

    #[test]
    fn test_verify_rejects_empty_url() {
        let result = HttpRequest::builder(HttpMethod::Get, "  ").build();
        assert!(matches!(result, Err(InvalidHttpRequestError::InvalidUrl { .. })));
    }

    #[test]
    fn test_header_names_are_case_insensitive() {
        let request = HttpRequest::builder(HttpMethod::Get, "/")
            .header("Accept", "text/html")
            .header("accept", "application/json")
            .build()
            .unwrap();

        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.headers.get("ACCEPT"), Some("application/json"));
    }

    #[test]
    fn test_resolve_relative_url_against_base() {
        let request = HttpRequest::builder(HttpMethod::Get, "/react-store-products")
            .build()
            .unwrap();

        assert_eq!(
            request.resolve_url(Some(&base())).unwrap(),
            "https://course-api.com/react-store-products"
        );
    }

    #[test]
    fn test_resolve_absolute_url_ignores_base() {
        let request = HttpRequest::builder(HttpMethod::Get, "https://icanhazdadjoke.com/")
            .build()
            .unwrap();

        assert_eq!(
            request.resolve_url(Some(&base())).unwrap(),
            "https://icanhazdadjoke.com/"
        );
    }

    #[test]
    fn test_resolve_relative_url_without_base_fails() {
        let request = HttpRequest::builder(HttpMethod::Get, "items").build().unwrap();

        assert!(matches!(
            request.resolve_url(None),
            Err(InvalidHttpRequestError::InvalidUrl { url }) if url == "items"
        ));
    }

    #[test]
    fn test_resolve_url_encodes_query() {
        let request = HttpRequest::builder(HttpMethod::Get, "/search?page=2")
            .query_param("q", "red shoes")
            .query_param("limit", "10")
            .build()
            .unwrap();

        assert_eq!(
            request.resolve_url(Some(&base())).unwrap(),
            "https://course-api.com/search?page=2&limit=10&q=red%20shoes"
        );
    }

    #[test]
    fn test_finalize_sets_content_type_and_absolute_url() {
        let mut request = HttpRequest::builder(HttpMethod::Post, "/items")
            .body(json!({"name": "chair"}))
            .body_type(DataType::Json)
            .query_param("dry_run", "true")
            .build()
            .unwrap();

        request.finalize(Some(&base())).unwrap();

        assert_eq!(request.url, "https://course-api.com/items?dry_run=true");
        assert!(request.query.is_none());
        assert_eq!(request.headers.get("content-type"), Some("application/json"));
    }

    #[test]
    fn test_finalize_keeps_explicit_content_type() {
        let mut request = HttpRequest::builder(HttpMethod::Post, "/items")
            .body(json!({"name": "chair"}))
            .body_type(DataType::Json)
            .header("Content-Type", "application/vnd.api+json")
            .build()
            .unwrap();

        request.finalize(Some(&base())).unwrap();

        assert_eq!(
            request.headers.get("content-type"),
            Some("application/vnd.api+json")
        );
    }

    #[test]
    fn test_finalize_rejects_header_value_with_line_break() {
        let mut request = HttpRequest::builder(HttpMethod::Get, "/items")
            .header("X-Bad", "line\nbreak")
            .build()
            .unwrap();

        assert_eq!(
            request.finalize(Some(&base())),
            Err(InvalidHttpRequestError::InvalidHeader {
                name: "x-bad".to_string()
            })
        );
    }

    #[test]
    fn test_encoded_body_text_is_unquoted() {
        let request = HttpRequest::builder(HttpMethod::Post, "/notes")
            .body("hello")
            .body_type(DataType::Text)
            .build()
            .unwrap();
        assert_eq!(request.encoded_body().as_deref(), Some("hello"));

        let request = HttpRequest::builder(HttpMethod::Post, "/notes")
            .body(json!({"a": 1}))
            .body_type(DataType::Json)
            .build()
            .unwrap();
        assert_eq!(request.encoded_body().as_deref(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn test_next_attempt_increments() {
        let mut request = HttpRequest::builder(HttpMethod::Get, "/").build().unwrap();
        request.next_attempt();
        request.next_attempt();
        assert_eq!(request.attempt(), 2);
    }
}
