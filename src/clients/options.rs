//! Per-request options.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Options for a single logical request.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use http_interceptors::RequestOptions;
/// use tokio_util::sync::CancellationToken;
///
/// let token = CancellationToken::new();
/// let options = RequestOptions::new()
///     .cancellation(token.clone())
///     .timeout(Duration::from_secs(2));
///
/// // Later, from anywhere:
/// token.cancel();
/// assert!(options.is_cancelled());
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    cancellation: Option<CancellationToken>,
    timeout: Option<Duration>,
}

impl RequestOptions {
    /// Creates options with no cancellation token and the client's timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the token that cancels the request.
    #[must_use]
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Overrides the client's per-attempt timeout for this request.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns `true` if the cancellation token has fired.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    pub(crate) fn into_parts(self) -> (CancellationToken, Option<Duration>) {
        (
            self.cancellation.unwrap_or_else(CancellationToken::new),
            self.timeout,
        )
    }
}
