//! HTTP client types.
//!
//! This module provides the request pipeline: the data model a request and its
//! response are made of, the failure taxonomy, and the client that drives a
//! request through interceptors, the transport and the retry policy.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`HttpClient`]: the request orchestrator
//! - [`HttpRequest`]: a request to be sent, with its attempt counter
//! - [`HttpResponse`]: a received response
//! - [`Headers`]: case-insensitive header map
//! - [`HttpMethod`]: supported HTTP methods
//! - [`DataType`]: content types for request bodies
//! - [`RequestOptions`]: per-request cancellation and timeout
//! - [`HttpError`]: every way a request can fail
//!
//! # Example
//!
//! ```rust,no_run
//! use http_interceptors::{ClientConfig, HttpClient, HttpMethod, HttpRequest, RequestOptions};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new(ClientConfig::default())?;
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "https://course-api.com/react-store-products")
//!     .query_param("page", "1")
//!     .build()?;
//!
//! let response = client.request(request, RequestOptions::default()).await?;
//! let products: serde_json::Value = response.json()?;
//! # Ok(())
//! # }
//! ```

mod errors;
mod headers;
mod http_client;
mod http_request;
mod http_response;
mod options;

pub use errors::{
    BoxError, CancelledError, HttpError, HttpResponseError, InterceptorError,
    InvalidHttpRequestError, MaxHttpRetriesExceededError, TransportFailure,
};
pub use headers::Headers;
pub use http_client::HttpClient;
pub use http_request::{DataType, HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;
pub use options::RequestOptions;

pub(crate) use headers::{check_header, InvalidHeader};
