//! The request orchestrator.
//!
//! This module provides the [`HttpClient`] type, which drives one logical
//! request through its stages:
//!
//! 1. **Building**: default headers are merged under the request's own
//!    headers, the request interceptor chain runs, and the URL is resolved.
//! 2. **Sending**: the transport is called (or a prepared response is used).
//!    A 2xx response succeeds; anything else is a failure.
//! 3. **Retrying**: the retry policy decides whether a failure is retried.
//!    The client waits for the computed delay, increments the attempt counter,
//!    and sends the same request again.
//! 4. **Completion**: the response interceptor chain runs over the success or
//!    the final failure.
//!
//! Cancellation aborts any stage at its next suspension point and returns
//! [`HttpError::Cancelled`]. A response chain that has not finished is
//! abandoned, so a cancelled request never yields a response.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::clients::errors::{
    CancelledError, HttpError, HttpResponseError, MaxHttpRetriesExceededError, TransportFailure,
};
use crate::clients::http_request::HttpRequest;
use crate::clients::http_response::HttpResponse;
use crate::clients::options::RequestOptions;
use crate::config::ClientConfig;
use crate::error::ConfigError;
use crate::interceptors::{
    run_fulfilled, run_rejected, ChainKind, Interceptor, InterceptorHandle, InterceptorRegistry,
};
use crate::retry::RetryDecision;
use crate::transport::{ReqwestTransport, Transport, TransportError, TransportErrorKind};

/// HTTP client with interceptor chains and retry handling.
///
/// The client handles:
/// - Default header merging and base URL resolution
/// - Ordered request and response interceptor chains
/// - Retries with exponential backoff, honouring `Retry-After`
/// - Per-attempt timeouts and caller-driven cancellation
///
/// Configuration is fixed at construction. Interceptors can be registered and
/// removed at any time; a request in flight keeps the chain it started with.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`. Share it with `Arc` to issue requests from
/// many tasks; each request keeps its own state.
///
/// # Example
///
/// ```rust,no_run
/// use http_interceptors::{BaseUrl, ClientConfig, HttpClient, HttpMethod, HttpRequest, RequestOptions};
/// use http_interceptors::interceptors::TracingInterceptor;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ClientConfig::builder()
///     .base_url(BaseUrl::new("https://course-api.com")?)
///     .build()?;
/// let client = HttpClient::new(config)?;
/// client.register_response_interceptor(TracingInterceptor);
///
/// let request = HttpRequest::builder(HttpMethod::Get, "/react-store-products").build()?;
/// let response = client.request(request, RequestOptions::default()).await?;
/// println!("{}", response.body);
/// # Ok(())
/// # }
/// ```
pub struct HttpClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    request_interceptors: InterceptorRegistry<HttpRequest>,
    response_interceptors: InterceptorRegistry<HttpResponse>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a client that sends requests with the default reqwest transport.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TransportInit`] if the reqwest client cannot be
    /// created.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_transport(config, ReqwestTransport::new()?))
    }

    /// Creates a client that sends requests through `transport`.
    #[must_use]
    pub fn with_transport(config: ClientConfig, transport: impl Transport + 'static) -> Self {
        Self {
            config,
            transport: Arc::new(transport),
            request_interceptors: InterceptorRegistry::new(ChainKind::Request),
            response_interceptors: InterceptorRegistry::new(ChainKind::Response),
        }
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Appends an interceptor to the request chain.
    pub fn register_request_interceptor<I>(&self, interceptor: I) -> InterceptorHandle
    where
        I: Interceptor<HttpRequest> + 'static,
    {
        self.request_interceptors.register(interceptor)
    }

    /// Appends an interceptor to the response chain.
    pub fn register_response_interceptor<I>(&self, interceptor: I) -> InterceptorHandle
    where
        I: Interceptor<HttpResponse> + 'static,
    {
        self.response_interceptors.register(interceptor)
    }

    /// Removes a previously registered interceptor from whichever chain it
    /// belongs to.
    ///
    /// Returns `false` if the handle was already removed; this is not an error.
    pub fn remove_interceptor(&self, handle: InterceptorHandle) -> bool {
        match handle.kind() {
            ChainKind::Request => self.request_interceptors.remove(handle),
            ChainKind::Response => self.response_interceptors.remove(handle),
        }
    }

    /// Returns the request chain registry.
    #[must_use]
    pub const fn request_interceptors(&self) -> &InterceptorRegistry<HttpRequest> {
        &self.request_interceptors
    }

    /// Returns the response chain registry.
    #[must_use]
    pub const fn response_interceptors(&self) -> &InterceptorRegistry<HttpResponse> {
        &self.response_interceptors
    }

    /// Sends `request` with default options.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.request(request, RequestOptions::default()).await
    }

    /// Runs one logical request to completion.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - A request interceptor rejects the request (`Interceptor`)
    /// - The request fails validation after the request chain (`InvalidRequest`)
    /// - No response is received (`Transport`)
    /// - A non-2xx response is received and not retried (`Response`)
    /// - Every allowed attempt failed with a retryable failure (`MaxRetries`)
    /// - The cancellation token fires (`Cancelled`)
    ///
    /// Apart from `Cancelled`, a failure is first offered to the response
    /// chain's rejected path, where an interceptor may recover it. A retryable
    /// failure on the last allowed attempt is reported as `MaxRetries`, even
    /// when only one attempt is allowed.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let request = HttpRequest::builder(HttpMethod::Get, "/react-store-products")
    ///     .build()
    ///     .unwrap();
    ///
    /// match client.request(request, RequestOptions::default()).await {
    ///     Ok(response) => println!("Products: {}", response.body),
    ///     Err(e) if e.status() == Some(404) => println!("NOT FOUND"),
    ///     Err(e) => return Err(e.into()),
    /// }
    /// ```
    pub async fn request(
        &self,
        mut request: HttpRequest,
        options: RequestOptions,
    ) -> Result<HttpResponse, HttpError> {
        let (cancellation, timeout) = options.into_parts();
        let timeout = timeout.or_else(|| self.config.timeout());
        let requested_url = request.url.clone();
        request.reset_attempt();

        let mut sent: u32 = 0;
        let outcome = tokio::select! {
            biased;
            () = cancellation.cancelled() => None,
            outcome = self.complete(request, timeout, &mut sent) => Some(outcome),
        };

        outcome.unwrap_or_else(|| {
            tracing::debug!(url = %requested_url, attempts = sent, "request cancelled");
            Err(CancelledError {
                url: requested_url,
                attempts: sent,
            }
            .into())
        })
    }

    /// Runs the request, then the response chain over its outcome.
    async fn complete(
        &self,
        request: HttpRequest,
        timeout: Option<Duration>,
        sent: &mut u32,
    ) -> Result<HttpResponse, HttpError> {
        let outcome = self.run(request, timeout, sent).await;
        let chain = self.response_interceptors.snapshot();
        match outcome {
            Ok(response) => run_fulfilled(&chain, response).await,
            Err(error) => run_rejected(&chain, error).await,
        }
    }

    /// Building, then the send/retry loop.
    async fn run(
        &self,
        request: HttpRequest,
        timeout: Option<Duration>,
        sent: &mut u32,
    ) -> Result<HttpResponse, HttpError> {
        let mut request = self.build(request).await?;
        let policy = self.config.retry_policy();

        loop {
            let failure = match self.send_once(&request, timeout, sent).await {
                Ok(response) if response.is_ok() => return Ok(response),
                Ok(response) => HttpError::from(HttpResponseError::new(request.clone(), response)),
                Err(source) => HttpError::from(TransportFailure {
                    request: Box::new(request.clone()),
                    source,
                }),
            };

            let attempt = request.attempt().saturating_add(1);
            match policy.should_retry(&failure, attempt) {
                RetryDecision::Retry { delay } => {
                    tracing::warn!(
                        url = %request.url,
                        attempt,
                        status = failure.status(),
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %failure,
                        "scheduling retry"
                    );
                    tokio::time::sleep(delay).await;
                    request.next_attempt();
                }
                RetryDecision::DoNotRetry => return Err(failure),
                RetryDecision::Exhausted => {
                    tracing::warn!(
                        url = %request.url,
                        tries = attempt,
                        error = %failure,
                        "retry budget exhausted"
                    );
                    return Err(MaxHttpRetriesExceededError {
                        tries: attempt,
                        last: Box::new(failure),
                    }
                    .into());
                }
            }
        }
    }

    /// Merges default headers, runs the request chain and resolves the URL.
    async fn build(&self, mut request: HttpRequest) -> Result<HttpRequest, HttpError> {
        let mut headers = self.config.default_headers().clone();
        headers.extend_from(&request.headers);
        request.headers = headers;

        let chain = self.request_interceptors.snapshot();
        let mut request = run_fulfilled(&chain, request).await?;
        request.finalize(self.config.base_url())?;
        Ok(request)
    }

    /// One pass through the Sending stage.
    async fn send_once(
        &self,
        request: &HttpRequest,
        timeout: Option<Duration>,
        sent: &mut u32,
    ) -> Result<HttpResponse, TransportError> {
        if let Some(prepared) = request.prepared_response() {
            tracing::debug!(url = %request.url, "using prepared response");
            return Ok(prepared.clone());
        }

        *sent += 1;
        tracing::debug!(
            method = request.http_method.as_str(),
            url = %request.url,
            attempt = request.attempt(),
            "sending request"
        );

        let send = self.transport.send(request);
        match timeout {
            Some(limit) => tokio::time::timeout(limit, send).await.unwrap_or_else(|_| {
                Err(TransportError::new(
                    TransportErrorKind::Timeout,
                    format!("no response within {}ms", limit.as_millis()),
                ))
            }),
            None => send.await,
        }
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("request_interceptors", &self.request_interceptors)
            .field("response_interceptors", &self.response_interceptors)
            .finish_non_exhaustive()
    }
}
