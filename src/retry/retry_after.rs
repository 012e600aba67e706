//! Parsing of the `Retry-After` rate-limit header.

use std::time::{Duration, SystemTime};

use chrono::DateTime;

use crate::clients::Headers;

/// Name of the header carrying the server-requested wait.
pub const RETRY_AFTER: &str = "retry-after";

/// Parses the `Retry-After` header into a wait duration.
///
/// Accepts delay-seconds, including fractional values such as `2.5`, and
/// HTTP-dates. A date in the past yields [`Duration::ZERO`]. Returns `None`
/// when the header is missing or malformed.
///
/// # Example
///
/// ```rust
/// use std::time::{Duration, SystemTime};
/// use http_interceptors::Headers;
/// use http_interceptors::retry::parse_retry_after;
///
/// let headers: Headers = [("Retry-After", "900")].into_iter().collect();
/// assert_eq!(
///     parse_retry_after(&headers, SystemTime::now()),
///     Some(Duration::from_secs(900))
/// );
/// ```
#[must_use]
pub fn parse_retry_after(headers: &Headers, now: SystemTime) -> Option<Duration> {
    let raw_value = headers.get(RETRY_AFTER)?.trim();

    if let Ok(seconds) = raw_value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    if let Ok(seconds) = raw_value.parse::<f64>() {
        return Duration::try_from_secs_f64(seconds).ok();
    }

    let date = DateTime::parse_from_rfc2822(raw_value).ok()?;
    let retry_at = SystemTime::from(date);
    Some(retry_at.duration_since(now).unwrap_or(Duration::ZERO))
}
