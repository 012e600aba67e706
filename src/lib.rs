//! # HTTP Interceptors
//!
//! An async HTTP request pipeline with ordered interceptor chains and a retry
//! policy engine.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//! - Ordered request and response interceptor chains with
//!   fulfilled/rejected routing ([`interceptors`])
//! - Retry with exponential backoff, jitter and `Retry-After` support ([`retry`])
//! - A pluggable [`Transport`](transport::Transport) seam with a reqwest-backed default
//! - Cancellation through [`RequestOptions`] and a precise failure taxonomy
//!   ([`HttpError`])
//!
//! ## Quick Start
//!
//! ```rust
//! use http_interceptors::{BaseUrl, ClientConfig, RetryPolicy};
//! use std::time::Duration;
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("https://course-api.com").unwrap())
//!     .retry_policy(
//!         RetryPolicy::new()
//!             .max_attempts(4)
//!             .base_delay(Duration::from_millis(250)),
//!     )
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Interceptors
//!
//! ```rust,no_run
//! use http_interceptors::{ClientConfig, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse};
//! use http_interceptors::interceptors::{FnInterceptor, HeaderInterceptor};
//!
//! # async fn run() -> Result<(), HttpError> {
//! let client = HttpClient::new(ClientConfig::default()).unwrap();
//!
//! client.register_request_interceptor(HeaderInterceptor::new("Authorization", "Bearer token"));
//! client.register_response_interceptor(
//!     FnInterceptor::<HttpResponse>::new().rejected(|error: HttpError| async move {
//!         if error.status() == Some(404) {
//!             println!("NOT FOUND");
//!         }
//!         Err(error)
//!     }),
//! );
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "https://course-api.com/react-store-products")
//!     .build()?;
//! let response = client.send(request).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Design Principles
//!
//! - **Precise failures**: callers branch on [`HttpError`] variants and status codes
//! - **Per-request state**: the attempt counter and request mutations never leak
//!   between concurrent requests
//! - **Snapshot chains**: registering or removing interceptors never affects a
//!   request already in flight
//! - **Thread-safe**: [`HttpClient`] is `Send + Sync`

pub mod clients;
pub mod config;
pub mod error;
pub mod interceptors;
pub mod retry;
pub mod transport;

use std::future::Future;
use std::pin::Pin;

/// A boxed, `Send` future, as returned by interceptor and transport methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

// Re-export public types at crate root for convenience
pub use config::{BaseUrl, ClientConfig, ClientConfigBuilder};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    CancelledError, DataType, Headers, HttpClient, HttpError, HttpMethod, HttpRequest,
    HttpRequestBuilder, HttpResponse, HttpResponseError, InterceptorError,
    InvalidHttpRequestError, MaxHttpRetriesExceededError, RequestOptions, TransportFailure,
};

// Re-export interceptor and retry types
pub use interceptors::{FnInterceptor, Interceptor, InterceptorHandle};
pub use retry::{JitterRange, RetryPolicy};
