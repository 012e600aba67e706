//! Case-insensitive header mapping shared by requests and responses.

use std::collections::BTreeMap;
use std::fmt;

use reqwest::header::{HeaderName, HeaderValue};

/// A header mapping with case-insensitive keys.
///
/// Keys are normalised to lowercase on insertion, so `Accept` and `accept`
/// address the same entry. Inserting an existing key replaces its value
/// (last write wins).
///
/// # Example
///
/// ```rust
/// use http_interceptors::Headers;
///
/// let mut headers = Headers::new();
/// headers.insert("Accept", "text/plain");
/// headers.insert("ACCEPT", "application/json");
///
/// assert_eq!(headers.len(), 1);
/// assert_eq!(headers.get("accept"), Some("application/json"));
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: BTreeMap<String, String>,
}

impl Headers {
    /// Creates an empty header mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a header, replacing any existing value for the same name.
    ///
    /// Returns the previous value, if any.
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) -> Option<String> {
        self.entries
            .insert(name.as_ref().to_ascii_lowercase(), value.into())
    }

    /// Returns the value for `name`, ignoring case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Removes the header `name`, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.remove(&name.to_ascii_lowercase())
    }

    /// Returns `true` if a header named `name` is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }

    /// Copies every entry of `other` into `self`, overwriting on conflict.
    pub fn extend_from(&mut self, other: &Self) {
        for (name, value) in &other.entries {
            self.entries.insert(name.clone(), value.clone());
        }
    }

    /// Iterates over `(name, value)` pairs with lowercase names.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Why a header cannot be put on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InvalidHeader {
    Name,
    Value,
}

/// Checks that `name` and `value` form a header the wire format accepts.
pub(crate) fn check_header(name: &str, value: &str) -> Result<(), InvalidHeader> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|_| InvalidHeader::Name)?;
    HeaderValue::from_str(value).map_err(|_| InvalidHeader::Value)?;
    Ok(())
}

impl fmt::Debug for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Credentials stay out of logs.
        let mut map = f.debug_map();
        for (name, value) in &self.entries {
            if matches!(name.as_str(), "authorization" | "proxy-authorization" | "cookie") {
                map.entry(name, &"*****");
            } else {
                map.entry(name, value);
            }
        }
        map.finish()
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

impl<K, V> Extend<(K, V)> for Headers
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_case_insensitive() {
        let mut headers = Headers::new();
        headers.insert("Content-Type", "application/json");

        assert_eq!(headers.get("content-type"), Some("application/json"));
        assert_eq!(headers.get("CONTENT-TYPE"), Some("application/json"));
        assert!(headers.contains("Content-type"));
    }

    #[test]
    fn test_last_write_wins() {
        let mut headers = Headers::new();
        assert_eq!(headers.insert("X-Trace", "one"), None);
        assert_eq!(headers.insert("x-trace", "two"), Some("one".to_string()));

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("X-Trace"), Some("two"));
    }

    #[test]
    fn test_extend_from_overwrites() {
        let mut base: Headers = [("Accept", "text/plain"), ("X-A", "1")]
            .into_iter()
            .collect();
        let overrides: Headers = [("accept", "application/json")].into_iter().collect();

        base.extend_from(&overrides);

        assert_eq!(base.get("accept"), Some("application/json"));
        assert_eq!(base.get("x-a"), Some("1"));
    }

    #[test]
    fn test_remove() {
        let mut headers: Headers = [("Authorization", "Bearer t")].into_iter().collect();
        assert_eq!(headers.remove("AUTHORIZATION"), Some("Bearer t".to_string()));
        assert!(headers.is_empty());
    }

    #[test]
    fn test_debug_masks_credentials() {
        let headers: Headers = [("Authorization", "Bearer secret"), ("Accept", "*/*")]
            .into_iter()
            .collect();
        let debug = format!("{headers:?}");

        assert!(!debug.contains("secret"));
        assert!(debug.contains("*/*"));
    }

    #[test]
    fn test_check_header() {
        assert_eq!(check_header("X-Request-Id", "abc"), Ok(()));
        assert_eq!(check_header("accept", "application/json"), Ok(()));
        assert_eq!(check_header("", "x"), Err(InvalidHeader::Name));
        assert_eq!(check_header("Bad Header", "x"), Err(InvalidHeader::Name));
        assert_eq!(check_header("colon:", "x"), Err(InvalidHeader::Name));
        assert_eq!(check_header("X-Bad", "line\nbreak"), Err(InvalidHeader::Value));
    }
}
