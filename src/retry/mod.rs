//! Retry policy engine.
//!
//! Decides whether a failed attempt is retried and how long to wait first.
//!
//! - [`RetryPolicy`]: attempt budget, backoff parameters and classification
//! - [`RetryDecision`]: the outcome of [`RetryPolicy::should_retry`]
//! - [`Classification`]: the per-failure verdict a custom classifier returns
//! - [`parse_retry_after`]: reads a server-requested wait from a response
//!
//! # Retry Behavior
//!
//! - **Transport failures**: retried with backoff
//! - **429, 502, 503, 504**: retried; a `Retry-After` header replaces backoff
//! - **Other statuses**: returned immediately without retry

mod policy;
mod retry_after;

pub use policy::{
    defaults, Classification, Classifier, JitterRange, RetryDecision, RetryPolicy,
};
pub use retry_after::{parse_retry_after, RETRY_AFTER};
