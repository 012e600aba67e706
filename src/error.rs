//! Error types for client construction.
//!
//! This module contains the error type returned while building a
//! [`ClientConfig`](crate::ClientConfig) or an [`HttpClient`](crate::HttpClient).
//! Runtime failures of individual requests live in
//! [`clients::HttpError`](crate::clients::HttpError).
//!
//! # Example
//!
//! ```rust
//! use http_interceptors::{BaseUrl, ConfigError};
//!
//! let result = BaseUrl::new("not a url");
//! assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur while configuring a client.
///
/// Configuration is validated once, at construction time. A client that was
/// built successfully never reports a `ConfigError` afterwards.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Base URL is invalid.
    #[error("Invalid base URL '{url}'. Please provide an absolute http or https URL (e.g., 'https://api.example.com').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A default header name is empty or contains characters not allowed in a header name.
    #[error("Invalid header name '{name}'. Header names must be non-empty visible ASCII without separators.")]
    InvalidHeaderName {
        /// The invalid header name.
        name: String,
    },

    /// A default header value contains characters not allowed in a header value.
    #[error("Invalid value for header '{name}'. Header values must be visible ASCII without line breaks.")]
    InvalidHeaderValue {
        /// The name of the header whose value was rejected.
        name: String,
    },

    /// Retry policy parameters are inconsistent.
    #[error("Invalid retry policy: {reason}")]
    InvalidRetryPolicy {
        /// The reason the policy was rejected.
        reason: String,
    },

    /// The default transport could not be initialised.
    #[error("Failed to initialise HTTP transport: {reason}")]
    TransportInit {
        /// The reason reported by the transport.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_base_url_error_message() {
        let error = ConfigError::InvalidBaseUrl {
            url: "ftp://nope".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("ftp://nope"));
        assert!(message.contains("absolute http or https URL"));
    }

    #[test]
    fn test_invalid_retry_policy_error_message() {
        let error = ConfigError::InvalidRetryPolicy {
            reason: "max_attempts must be at least 1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid retry policy: max_attempts must be at least 1"
        );
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::InvalidHeaderName {
            name: String::new(),
        };
        let _: &dyn std::error::Error = &error;
    }
}
