//! Ready-made interceptors.

use std::future;

use crate::clients::{HttpError, HttpRequest, HttpResponse};
use crate::BoxFuture;

use super::Interceptor;

/// Sets one header on every outgoing request, replacing any existing value.
///
/// # Example
///
/// ```rust
/// use http_interceptors::interceptors::HeaderInterceptor;
///
/// let auth = HeaderInterceptor::new("Authorization", "Bearer token");
/// assert_eq!(auth.name(), "authorization");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderInterceptor {
    name: String,
    value: String,
}

impl HeaderInterceptor {
    /// Creates an interceptor that sets `name` to `value`.
    #[must_use]
    pub fn new(name: impl AsRef<str>, value: impl Into<String>) -> Self {
        Self {
            name: name.as_ref().to_ascii_lowercase(),
            value: value.into(),
        }
    }

    /// Creates an interceptor that sets `Accept: application/json`.
    #[must_use]
    pub fn accept_json() -> Self {
        Self::new("Accept", "application/json")
    }

    /// Returns the lowercase header name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the header value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Interceptor<HttpRequest> for HeaderInterceptor {
    fn on_fulfilled<'a>(
        &'a self,
        mut request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpRequest, HttpError>> {
        request.headers.insert(&self.name, self.value.clone());
        Box::pin(future::ready(Ok(request)))
    }
}

/// Logs requests, responses and failures through `tracing`.
///
/// Register it on both chains to see the whole exchange:
///
/// ```rust
/// use http_interceptors::interceptors::TracingInterceptor;
/// use http_interceptors::{ClientConfig, HttpClient};
///
/// let client = HttpClient::new(ClientConfig::default()).unwrap();
/// client.register_request_interceptor(TracingInterceptor);
/// client.register_response_interceptor(TracingInterceptor);
/// ```
///
/// Failures are logged and passed on; the interceptor never recovers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TracingInterceptor;

impl Interceptor<HttpRequest> for TracingInterceptor {
    fn on_fulfilled<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpRequest, HttpError>> {
        tracing::info!(
            method = request.http_method.as_str(),
            url = %request.url,
            attempt = request.attempt(),
            "sending request"
        );
        Box::pin(future::ready(Ok(request)))
    }

    fn on_rejected<'a>(
        &'a self,
        error: HttpError,
    ) -> BoxFuture<'a, Result<HttpRequest, HttpError>> {
        tracing::warn!(error = %error, "request preparation failed");
        Box::pin(future::ready(Err(error)))
    }
}

impl Interceptor<HttpResponse> for TracingInterceptor {
    fn on_fulfilled<'a>(
        &'a self,
        response: HttpResponse,
    ) -> BoxFuture<'a, Result<HttpResponse, HttpError>> {
        tracing::info!(
            status = response.code,
            request_id = response.request_id(),
            "received response"
        );
        Box::pin(future::ready(Ok(response)))
    }

    fn on_rejected<'a>(
        &'a self,
        error: HttpError,
    ) -> BoxFuture<'a, Result<HttpResponse, HttpError>> {
        match error.status() {
            Some(404) => {
                let url = error.request().map(|request| request.url.clone());
                tracing::warn!(url = url.as_deref(), "resource not found");
            }
            Some(status) => tracing::warn!(status, error = %error, "request failed"),
            None => tracing::warn!(error = %error, "request failed"),
        }
        Box::pin(future::ready(Err(error)))
    }
}
