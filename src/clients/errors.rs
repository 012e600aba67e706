//! Failure types for requests sent through the client.
//!
//! Every way a logical request can fail is a variant of [`HttpError`]:
//!
//! - [`TransportFailure`]: no response was received (connect, DNS, timeout)
//! - [`HttpResponseError`]: a response was received with a non-2xx status
//! - [`InterceptorError`]: an interceptor rejected the value it was given
//! - [`CancelledError`]: the caller cancelled the request
//! - [`MaxHttpRetriesExceededError`]: retries ran out; carries the last failure
//! - [`InvalidHttpRequestError`]: the request descriptor failed validation
//!
//! Failures are never swallowed by the client. The only way to turn a
//! failure into a response is a response interceptor's `on_rejected` hook.
//!
//! # Example
//!
//! ```rust,ignore
//! use http_interceptors::HttpError;
//!
//! match client.request(request, RequestOptions::default()).await {
//!     Ok(response) => println!("Success: {}", response.body),
//!     Err(HttpError::Response(e)) if e.code == 404 => println!("NOT FOUND"),
//!     Err(HttpError::MaxRetries(e)) => println!("Gave up after {} tries", e.tries),
//!     Err(HttpError::Cancelled(_)) => println!("Cancelled"),
//!     Err(e) => println!("Failed: {e}"),
//! }
//! ```

use thiserror::Error;

use crate::clients::http_request::HttpRequest;
use crate::clients::http_response::HttpResponse;
use crate::transport::TransportError;

/// Boxed error used for wrapped causes.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

const MESSAGE_BODY_LIMIT: usize = 200;

/// A request that never produced a response.
#[derive(Debug, Error)]
#[error("Network error on {} {}: {source}", .request.http_method.as_str(), .request.url)]
pub struct TransportFailure {
    /// The request as it was handed to the transport.
    pub request: Box<HttpRequest>,
    /// The error reported by the transport.
    #[source]
    pub source: TransportError,
}

/// Error returned when a request receives a non-successful response.
///
/// The message follows the form `Request failed with status code {code}`,
/// followed by the start of the response body when there is one.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Human-readable error message.
    pub message: String,
    /// Reference ID for error reporting (from the `X-Request-Id` header).
    pub error_reference: Option<String>,
    /// The request that produced the response.
    pub request: Box<HttpRequest>,
    /// The full response.
    pub response: Box<HttpResponse>,
}

impl HttpResponseError {
    /// Builds the error for `response`, received for `request`.
    #[must_use]
    pub fn new(request: HttpRequest, response: HttpResponse) -> Self {
        let code = response.code;
        let body = response.body.trim();
        let message = if body.is_empty() {
            format!("Request failed with status code {code}")
        } else {
            let snippet: String = body.chars().take(MESSAGE_BODY_LIMIT).collect();
            format!("Request failed with status code {code}: {snippet}")
        };
        Self {
            code,
            message,
            error_reference: response.request_id().map(String::from),
            request: Box::new(request),
            response: Box::new(response),
        }
    }
}

/// Error raised by an interceptor.
///
/// Interceptors return this from `on_fulfilled` to reject the value they were
/// given. The remaining interceptors of the chain then see it on their
/// `on_rejected` hooks.
///
/// # Example
///
/// ```rust
/// use http_interceptors::clients::InterceptorError;
///
/// let error = InterceptorError::new("missing auth token");
/// assert_eq!(error.to_string(), "Interceptor failed: missing auth token");
/// ```
#[derive(Debug, Error)]
#[error("Interceptor failed: {message}")]
pub struct InterceptorError {
    /// Description of the failure.
    pub message: String,
    /// The request being processed, when the interceptor had one.
    pub request: Option<Box<HttpRequest>>,
    /// The wrapped cause, if any.
    #[source]
    pub source: Option<BoxError>,
}

impl InterceptorError {
    /// Creates an interceptor error with a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            request: None,
            source: None,
        }
    }

    /// Attaches the request that was being processed.
    #[must_use]
    pub fn with_request(mut self, request: HttpRequest) -> Self {
        self.request = Some(Box::new(request));
        self
    }

    /// Attaches a wrapped cause.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Error returned when the caller cancels a request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Request to {url} was cancelled after {attempts} attempt(s)")]
pub struct CancelledError {
    /// The URL of the cancelled request.
    pub url: String,
    /// Number of transport attempts issued before cancellation.
    pub attempts: u32,
}

/// Error returned when maximum retry attempts have been exhausted.
///
/// Raised when a request keeps failing with retryable failures after all
/// configured attempts have been made. The last underlying failure is kept.
#[derive(Debug, Error)]
#[error("Exceeded maximum retry count of {tries}. Last error: {last}")]
pub struct MaxHttpRetriesExceededError {
    /// The number of tries that were attempted.
    pub tries: u32,
    /// The failure of the final attempt.
    #[source]
    pub last: Box<HttpError>,
}

impl MaxHttpRetriesExceededError {
    /// Returns the HTTP status code of the last attempt, if it received a response.
    #[must_use]
    pub fn code(&self) -> Option<u16> {
        self.last.status()
    }
}

/// Error returned when a request descriptor fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A request body was provided without specifying the body type.
    #[error("Cannot set a body without also setting body_type.")]
    MissingBodyType,

    /// A POST, PUT or PATCH request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// A header name or value cannot be sent on the wire.
    #[error("Invalid header '{name}'. Header names must be tokens and values must not contain line breaks.")]
    InvalidHeader {
        /// The name of the rejected header.
        name: String,
    },

    /// The URL is empty, or relative while no base URL is configured.
    #[error("Invalid request URL '{url}'. Use an absolute URL or configure a base URL.")]
    InvalidUrl {
        /// The URL that could not be resolved.
        url: String,
    },
}

/// Unified error type for all request failures.
#[derive(Debug, Error)]
pub enum HttpError {
    /// No response was received.
    #[error(transparent)]
    Transport(#[from] TransportFailure),

    /// A non-2xx response was received.
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// An interceptor rejected the request or response.
    #[error(transparent)]
    Interceptor(#[from] InterceptorError),

    /// The caller cancelled the request.
    #[error(transparent)]
    Cancelled(#[from] CancelledError),

    /// Maximum retry attempts exhausted.
    #[error(transparent)]
    MaxRetries(#[from] MaxHttpRetriesExceededError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),
}

impl HttpError {
    /// Returns the HTTP status code, if a response was received.
    ///
    /// For [`HttpError::MaxRetries`] this is the status of the last attempt.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.code),
            Self::MaxRetries(e) => e.code(),
            _ => None,
        }
    }

    /// Returns the response, if one was received.
    #[must_use]
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            Self::Response(e) => Some(&*e.response),
            Self::MaxRetries(e) => e.last.response(),
            _ => None,
        }
    }

    /// Returns the originating request, when the failure carries one.
    #[must_use]
    pub fn request(&self) -> Option<&HttpRequest> {
        match self {
            Self::Transport(e) => Some(&*e.request),
            Self::Response(e) => Some(&*e.request),
            Self::Interceptor(e) => e.request.as_deref(),
            Self::MaxRetries(e) => e.last.request(),
            Self::Cancelled(_) | Self::InvalidRequest(_) => None,
        }
    }

    /// Returns `true` if the request was cancelled by the caller.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }

    /// Returns the innermost failure, unwrapping [`HttpError::MaxRetries`].
    #[must_use]
    pub fn last_failure(&self) -> &Self {
        match self {
            Self::MaxRetries(e) => e.last.last_failure(),
            other => other,
        }
    }
}
