//! The transport seam: the single place where network I/O happens.
//!
//! A [`Transport`] takes a fully prepared [`HttpRequest`] (absolute URL,
//! merged headers) and returns the [`HttpResponse`] the server produced, or a
//! [`TransportError`] when no response was received. Transports know nothing
//! about interceptors or retries; a non-2xx status is a successful transport
//! call.
//!
//! [`ReqwestTransport`] is the default implementation. Tests and embedders can
//! provide their own.
//!
//! # Example
//!
//! ```rust
//! use http_interceptors::transport::{Transport, TransportError};
//! use http_interceptors::{BoxFuture, Headers, HttpRequest, HttpResponse};
//!
//! struct Canned;
//!
//! impl Transport for Canned {
//!     fn send<'a>(
//!         &'a self,
//!         _request: &'a HttpRequest,
//!     ) -> BoxFuture<'a, Result<HttpResponse, TransportError>> {
//!         Box::pin(async { Ok(HttpResponse::new(200, Headers::new(), "{}")) })
//!     }
//! }
//! ```

mod reqwest_transport;

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::clients::{BoxError, HttpRequest, HttpResponse};
use crate::BoxFuture;

pub use reqwest_transport::ReqwestTransport;

/// Broad category of a transport failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The connection could not be established (DNS, refused, TLS).
    Connect,
    /// The attempt did not complete in time.
    Timeout,
    /// The connection broke while reading the response body.
    Body,
    /// The request could not be encoded; sending it again cannot succeed.
    Request,
    /// Any other failure.
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => write!(f, "connection failed"),
            Self::Timeout => write!(f, "timed out"),
            Self::Body => write!(f, "failed to read response body"),
            Self::Request => write!(f, "invalid request"),
            Self::Other => write!(f, "transport error"),
        }
    }
}

/// Error reported by a [`Transport`] when no response was received.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    /// Category of the failure.
    pub kind: TransportErrorKind,
    /// Description of the failure.
    pub message: String,
    /// The underlying cause, if any.
    #[source]
    pub source: Option<BoxError>,
}

impl TransportError {
    /// Creates a transport error without an underlying cause.
    #[must_use]
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attaches the underlying cause.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns `true` for [`TransportErrorKind::Timeout`].
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.kind == TransportErrorKind::Timeout
    }
}

/// Performs the actual network call for a prepared request.
///
/// Implementations must be safe for concurrent use: a single client shares
/// its transport between every in-flight request.
pub trait Transport: Send + Sync {
    /// Sends `request` and returns the response, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no response was received.
    fn send<'a>(
        &'a self,
        request: &'a HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send<'a>(
        &'a self,
        request: &'a HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send<'a>(
        &'a self,
        request: &'a HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>> {
        (**self).send(request)
    }
}
