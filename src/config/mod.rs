//! Configuration types for the HTTP client.
//!
//! # Overview
//!
//! - [`ClientConfig`]: everything a client needs besides its transport
//! - [`ClientConfigBuilder`]: a builder for constructing [`ClientConfig`] instances
//! - [`BaseUrl`]: a validated absolute base URL
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use http_interceptors::{BaseUrl, ClientConfig, RetryPolicy};
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("https://course-api.com").unwrap())
//!     .default_header("X-Client", "catalog")
//!     .retry_policy(RetryPolicy::new().max_attempts(5))
//!     .timeout(Duration::from_secs(10))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.retry_policy().max_attempts, 5);
//! ```

mod newtypes;

use std::time::Duration;

pub use newtypes::BaseUrl;

use crate::clients::{check_header, Headers, InvalidHeader};
use crate::error::ConfigError;
use crate::retry::RetryPolicy;

/// Library version from Cargo.toml.
pub const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configuration for an [`HttpClient`](crate::HttpClient).
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`.
///
/// # Defaults
///
/// - `base_url`: `None`; request URLs must then be absolute
/// - `default_headers`: `User-Agent` and `Accept: application/json`
/// - `retry_policy`: [`RetryPolicy::default`]
/// - `timeout`: `None`; attempts are not bounded
/// - `user_agent_prefix`: `None`
#[derive(Clone, Debug)]
pub struct ClientConfig {
    base_url: Option<BaseUrl>,
    default_headers: Headers,
    retry_policy: RetryPolicy,
    timeout: Option<Duration>,
    user_agent_prefix: Option<String>,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the base URL, if configured.
    #[must_use]
    pub const fn base_url(&self) -> Option<&BaseUrl> {
        self.base_url.as_ref()
    }

    /// Returns the headers merged under every request's own headers.
    ///
    /// Includes the computed `User-Agent` and `Accept` headers unless they
    /// were overridden.
    #[must_use]
    pub const fn default_headers(&self) -> &Headers {
        &self.default_headers
    }

    /// Returns the retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Returns the per-attempt timeout, if configured.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            default_headers: computed_headers(None),
            retry_policy: RetryPolicy::default(),
            timeout: None,
            user_agent_prefix: None,
        }
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

fn computed_headers(user_agent_prefix: Option<&str>) -> Headers {
    let prefix = user_agent_prefix.map_or(String::new(), |prefix| format!("{prefix} | "));
    let user_agent = format!("{prefix}http-interceptors v{LIBRARY_VERSION}");

    let mut headers = Headers::new();
    headers.insert("User-Agent", user_agent);
    headers.insert("Accept", "application/json");
    headers
}

/// Builder for constructing [`ClientConfig`] instances.
///
/// Every field is optional.
///
/// # Example
///
/// ```rust
/// use http_interceptors::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .user_agent_prefix("MyApp/1.0")
///     .build()
///     .unwrap();
///
/// let user_agent = config.default_headers().get("user-agent").unwrap();
/// assert!(user_agent.starts_with("MyApp/1.0 | http-interceptors v"));
/// ```
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<BaseUrl>,
    default_headers: Vec<(String, String)>,
    retry_policy: Option<RetryPolicy>,
    timeout: Option<Duration>,
    user_agent_prefix: Option<String>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL relative request URLs are joined to.
    #[must_use]
    pub fn base_url(mut self, base_url: BaseUrl) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Adds a header sent with every request unless the request sets it.
    ///
    /// Names are validated by [`build`](Self::build).
    #[must_use]
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Sets the time limit of a single transport attempt.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the prefix of the `User-Agent` header.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`ClientConfig`], validating headers and the retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHeaderName`] or
    /// [`ConfigError::InvalidHeaderValue`] for a malformed default header or
    /// user-agent prefix, and [`ConfigError::InvalidRetryPolicy`] if the
    /// policy fails [`RetryPolicy::validate`].
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let mut default_headers = computed_headers(self.user_agent_prefix.as_deref());
        if let Some(user_agent) = default_headers.get("user-agent") {
            if check_header("User-Agent", user_agent).is_err() {
                return Err(ConfigError::InvalidHeaderValue {
                    name: "User-Agent".to_string(),
                });
            }
        }
        for (name, value) in self.default_headers {
            match check_header(&name, &value) {
                Ok(()) => {}
                Err(InvalidHeader::Name) => return Err(ConfigError::InvalidHeaderName { name }),
                Err(InvalidHeader::Value) => return Err(ConfigError::InvalidHeaderValue { name }),
            }
            default_headers.insert(name, value);
        }

        let retry_policy = self.retry_policy.unwrap_or_default();
        retry_policy.validate()?;

        if self.timeout == Some(Duration::ZERO) {
            return Err(ConfigError::InvalidRetryPolicy {
                reason: "timeout must be greater than zero".to_string(),
            });
        }

        Ok(ClientConfig {
            base_url: self.base_url,
            default_headers,
            retry_policy,
            timeout: self.timeout,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = ClientConfig::builder().build().unwrap();

        assert!(config.base_url().is_none());
        assert!(config.timeout().is_none());
        assert!(config.user_agent_prefix().is_none());
        assert_eq!(config.retry_policy().max_attempts, 3);
        assert_eq!(
            config.default_headers().get("accept"),
            Some("application/json")
        );
        assert!(config
            .default_headers()
            .get("user-agent")
            .unwrap()
            .starts_with("http-interceptors v"));
    }

    #[test]
    fn test_default_matches_empty_builder() {
        let built = ClientConfig::builder().build().unwrap();
        let default = ClientConfig::default();
        assert_eq!(built.default_headers(), default.default_headers());
        assert_eq!(built.timeout(), default.timeout());
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = ClientConfig::builder()
            .user_agent_prefix("MyApp/1.0")
            .build()
            .unwrap();

        let user_agent = config.default_headers().get("user-agent").unwrap();
        assert!(user_agent.starts_with("MyApp/1.0 | "));
        assert!(user_agent.contains("http-interceptors"));
    }

    #[test]
    fn test_default_headers_override_computed_ones() {
        let config = ClientConfig::builder()
            .default_header("Accept", "text/html")
            .default_header("X-Api-Key", "secret")
            .build()
            .unwrap();

        assert_eq!(config.default_headers().get("accept"), Some("text/html"));
        assert_eq!(config.default_headers().get("x-api-key"), Some("secret"));
    }

    #[test]
    fn test_builder_rejects_invalid_header_name() {
        let result = ClientConfig::builder()
            .default_header("Bad Header", "x")
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::InvalidHeaderName { name }) if name == "Bad Header"
        ));
    }

    #[test]
    fn test_builder_rejects_invalid_header_value() {
        let result = ClientConfig::builder()
            .default_header("X-Bad", "line\nbreak")
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::InvalidHeaderValue { name }) if name == "X-Bad"
        ));
    }

    #[test]
    fn test_builder_rejects_user_agent_prefix_with_line_break() {
        let result = ClientConfig::builder()
            .user_agent_prefix("my-app\r\nX-Injected: 1")
            .build();

        assert!(matches!(result, Err(ConfigError::InvalidHeaderValue { .. })));
    }

    #[test]
    fn test_builder_rejects_invalid_retry_policy() {
        let result = ClientConfig::builder()
            .retry_policy(RetryPolicy::new().max_attempts(0))
            .build();

        assert!(matches!(result, Err(ConfigError::InvalidRetryPolicy { .. })));
    }

    #[test]
    fn test_builder_rejects_zero_timeout() {
        let result = ClientConfig::builder().timeout(Duration::ZERO).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_with_all_optional_fields() {
        let base_url = BaseUrl::new("https://course-api.com").unwrap();

        let config = ClientConfig::builder()
            .base_url(base_url.clone())
            .retry_policy(RetryPolicy::no_retry())
            .timeout(Duration::from_secs(5))
            .user_agent_prefix("MyApp/1.0")
            .build()
            .unwrap();

        assert_eq!(config.base_url(), Some(&base_url));
        assert_eq!(config.retry_policy().max_attempts, 1);
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.user_agent_prefix(), Some("MyApp/1.0"));
    }

    #[test]
    fn test_config_is_clone_and_debug() {
        let config = ClientConfig::builder().build().unwrap();
        let cloned = config.clone();
        assert_eq!(cloned.default_headers(), config.default_headers());

        let debug_str = format!("{config:?}");
        assert!(debug_str.contains("ClientConfig"));
    }
}
