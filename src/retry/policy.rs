//! Retry classification and backoff computation.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;

use crate::clients::HttpError;
use crate::error::ConfigError;
use crate::transport::TransportErrorKind;

/// Default configuration values.
pub mod defaults {
    use std::time::Duration;

    /// Default total number of attempts, including the first.
    pub const MAX_ATTEMPTS: u32 = 3;

    /// Default delay before the first retry.
    pub const BASE_DELAY: Duration = Duration::from_millis(500);

    /// Default multiplier for exponential backoff.
    pub const MULTIPLIER: f64 = 2.0;

    /// Default upper bound for computed backoff delays.
    pub const MAX_DELAY: Duration = Duration::from_secs(30);

    /// Statuses retried by default: rate limiting and gateway failures.
    pub const RETRYABLE_STATUSES: [u16; 4] = [429, 502, 503, 504];

    /// Largest exponent applied to the multiplier.
    pub const MAX_BACKOFF_EXPONENT: u32 = 10;
}

/// Uniform random jitter added to computed backoff delays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JitterRange {
    /// Smallest jitter added.
    pub min: Duration,
    /// Largest jitter added.
    pub max: Duration,
}

impl JitterRange {
    /// Creates a jitter range `[min, max]`.
    #[must_use]
    pub const fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    /// Creates a jitter range `[0, max]`.
    #[must_use]
    pub const fn up_to(max: Duration) -> Self {
        Self {
            min: Duration::ZERO,
            max,
        }
    }

    fn sample(&self) -> Duration {
        let lo = duration_millis(self.min);
        let hi = duration_millis(self.max);
        if lo >= hi {
            return self.min;
        }
        Duration::from_millis(rand::thread_rng().gen_range(lo..=hi))
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// How a failure should be treated by the retry engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Classification {
    /// Whether the failure may be retried.
    pub retryable: bool,
    /// A wait that takes precedence over computed backoff, such as the
    /// value of a `Retry-After` header.
    pub delay_override: Option<Duration>,
}

impl Classification {
    /// A failure that must not be retried.
    #[must_use]
    pub const fn fatal() -> Self {
        Self {
            retryable: false,
            delay_override: None,
        }
    }

    /// A retryable failure using computed backoff.
    #[must_use]
    pub const fn retryable() -> Self {
        Self {
            retryable: true,
            delay_override: None,
        }
    }

    /// A retryable failure with an explicit wait.
    #[must_use]
    pub const fn retry_after(delay: Duration) -> Self {
        Self {
            retryable: true,
            delay_override: Some(delay),
        }
    }
}

/// Custom failure classifier.
pub type Classifier = Arc<dyn Fn(&HttpError) -> Classification + Send + Sync>;

/// Outcome of [`RetryPolicy::should_retry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry after `delay`.
    Retry {
        /// How long to wait before the next attempt.
        delay: Duration,
    },
    /// The failure is not retryable.
    DoNotRetry,
    /// The failure is retryable but the attempt budget is spent.
    Exhausted,
}

impl RetryDecision {
    /// Returns `true` if another attempt should be made.
    #[must_use]
    pub const fn is_retry(&self) -> bool {
        matches!(self, Self::Retry { .. })
    }

    /// Returns the wait before the next attempt, or zero when not retrying.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        match self {
            Self::Retry { delay } => *delay,
            Self::DoNotRetry | Self::Exhausted => Duration::ZERO,
        }
    }
}

/// Configuration for retrying failed attempts.
///
/// # Default Values
///
/// - `max_attempts`: 3 (the first attempt plus two retries)
/// - `base_delay`: 500 ms
/// - `multiplier`: 2.0
/// - `jitter`: none
/// - `max_delay`: 30 seconds
/// - `retryable_statuses`: 429, 502, 503, 504
/// - `retry_transport_errors`: `true`
///
/// # Delay
///
/// When the failed response carries a `Retry-After` header its value is used
/// verbatim. Otherwise the delay for the 1-based attempt `n` is
/// `base_delay * multiplier^(n - 1)` (exponent capped at 10), plus jitter,
/// clamped to `max_delay`.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use http_interceptors::retry::{JitterRange, RetryPolicy};
///
/// let policy = RetryPolicy::new()
///     .max_attempts(5)
///     .base_delay(Duration::from_millis(100))
///     .jitter(JitterRange::up_to(Duration::from_millis(50)))
///     .max_delay(Duration::from_secs(10));
///
/// assert!(policy.validate().is_ok());
/// ```
#[derive(Clone)]
pub struct RetryPolicy {
    /// Total number of attempts allowed for one logical request (at least 1).
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Multiplier for exponential backoff. Must be >= 1.0.
    pub multiplier: f64,
    /// Random jitter added to computed delays.
    pub jitter: Option<JitterRange>,
    /// Upper bound for computed delays.
    pub max_delay: Duration,
    /// HTTP statuses that are retried.
    pub retryable_statuses: BTreeSet<u16>,
    /// Whether transport failures are retried.
    pub retry_transport_errors: bool,
    classifier: Option<Classifier>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: defaults::MAX_ATTEMPTS,
            base_delay: defaults::BASE_DELAY,
            multiplier: defaults::MULTIPLIER,
            jitter: None,
            max_delay: defaults::MAX_DELAY,
            retryable_statuses: defaults::RETRYABLE_STATUSES.into_iter().collect(),
            retry_transport_errors: true,
            classifier: None,
        }
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("base_delay", &self.base_delay)
            .field("multiplier", &self.multiplier)
            .field("jitter", &self.jitter)
            .field("max_delay", &self.max_delay)
            .field("retryable_statuses", &self.retryable_statuses)
            .field("retry_transport_errors", &self.retry_transport_errors)
            .field("classifier", &self.classifier.as_ref().map(|_| "<custom>"))
            .finish()
    }
}

impl RetryPolicy {
    /// Creates a policy with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a policy that makes a single attempt.
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Sets the total number of attempts.
    #[must_use]
    pub const fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the delay before the first retry.
    #[must_use]
    pub const fn base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Sets the backoff multiplier.
    #[must_use]
    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Sets the jitter range.
    #[must_use]
    pub const fn jitter(mut self, jitter: JitterRange) -> Self {
        self.jitter = Some(jitter);
        self
    }

    /// Sets the upper bound for computed delays.
    #[must_use]
    pub const fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Replaces the set of retryable statuses.
    #[must_use]
    pub fn retryable_statuses(mut self, statuses: impl IntoIterator<Item = u16>) -> Self {
        self.retryable_statuses = statuses.into_iter().collect();
        self
    }

    /// Sets whether transport failures are retried.
    #[must_use]
    pub const fn retry_transport_errors(mut self, retry: bool) -> Self {
        self.retry_transport_errors = retry;
        self
    }

    /// Replaces the default classification with `classifier`.
    #[must_use]
    pub fn classifier<F>(mut self, classifier: F) -> Self
    where
        F: Fn(&HttpError) -> Classification + Send + Sync + 'static,
    {
        self.classifier = Some(Arc::new(classifier));
        self
    }

    /// Checks the policy parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRetryPolicy`] if `max_attempts` is 0, the
    /// multiplier is below 1.0 or not finite, the jitter range is inverted, or
    /// `base_delay` exceeds `max_delay`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| {
            Err(ConfigError::InvalidRetryPolicy {
                reason: reason.to_string(),
            })
        };

        if self.max_attempts == 0 {
            return invalid("max_attempts must be at least 1");
        }
        if !self.multiplier.is_finite() || self.multiplier < 1.0 {
            return invalid("multiplier must be a finite number >= 1.0");
        }
        if let Some(jitter) = &self.jitter {
            if jitter.min > jitter.max {
                return invalid("jitter min must not exceed jitter max");
            }
        }
        if self.base_delay > self.max_delay {
            return invalid("base_delay must not exceed max_delay");
        }
        Ok(())
    }

    /// Classifies a failure.
    ///
    /// Uses the custom classifier when one is set. By default transport
    /// failures are retryable when `retry_transport_errors` is set, except
    /// requests the transport could not encode. Responses
    /// are retryable when their status is in `retryable_statuses`, and a
    /// `Retry-After` header on the response becomes the delay override.
    #[must_use]
    pub fn classify(&self, failure: &HttpError) -> Classification {
        if let Some(classifier) = &self.classifier {
            return classifier(failure);
        }

        match failure {
            HttpError::Transport(e) if e.source.kind == TransportErrorKind::Request => {
                Classification::fatal()
            }
            HttpError::Transport(_) if self.retry_transport_errors => Classification::retryable(),
            HttpError::Response(e) if self.retryable_statuses.contains(&e.code) => {
                match e.response.retry_after() {
                    Some(delay) => Classification::retry_after(delay),
                    None => Classification::retryable(),
                }
            }
            _ => Classification::fatal(),
        }
    }

    /// Decides whether to retry after the 1-based attempt `attempt` failed.
    #[must_use]
    pub fn should_retry(&self, failure: &HttpError, attempt: u32) -> RetryDecision {
        let classification = self.classify(failure);
        if !classification.retryable {
            return RetryDecision::DoNotRetry;
        }
        if attempt >= self.max_attempts {
            return RetryDecision::Exhausted;
        }

        let delay = classification
            .delay_override
            .unwrap_or_else(|| self.backoff_delay(attempt));
        RetryDecision::Retry { delay }
    }

    /// Computes the backoff delay after the 1-based attempt `attempt`.
    #[must_use]
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt
            .saturating_sub(1)
            .min(defaults::MAX_BACKOFF_EXPONENT);
        let factor = self.multiplier.powi(i32::try_from(exponent).unwrap_or(i32::MAX));
        let secs = self.base_delay.as_secs_f64() * factor;

        let base = Duration::try_from_secs_f64(secs).unwrap_or(self.max_delay);
        let jittered = match &self.jitter {
            Some(jitter) => base.saturating_add(jitter.sample()),
            None => base,
        };
        jittered.min(self.max_delay)
    }
}
