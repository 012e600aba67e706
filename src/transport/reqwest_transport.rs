//! Default [`Transport`] backed by `reqwest`.

use super::{Transport, TransportError, TransportErrorKind};
use crate::clients::{Headers, HttpMethod, HttpRequest, HttpResponse};
use crate::error::ConfigError;
use crate::BoxFuture;

/// A [`Transport`] that sends requests with a shared `reqwest::Client`.
///
/// The underlying client pools connections, so a single `ReqwestTransport`
/// should be reused for the lifetime of an [`HttpClient`](crate::HttpClient).
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

// Verify ReqwestTransport is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ReqwestTransport>();
};

impl ReqwestTransport {
    /// Creates a transport using rustls.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TransportInit`] if the reqwest client cannot be
    /// created (for example on TLS initialisation failure).
    pub fn new() -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .map_err(|e| ConfigError::TransportInit {
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }

    /// Wraps an existing `reqwest::Client`.
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Head => reqwest::Method::HEAD,
        }
    }

    /// Collects response headers; repeated headers are joined with `", "`.
    fn parse_response_headers(headers: &reqwest::header::HeaderMap) -> Headers {
        let mut result = Headers::new();
        for (name, value) in headers {
            let value = String::from_utf8_lossy(value.as_bytes());
            let merged = match result.get(name.as_str()) {
                Some(existing) => format!("{existing}, {value}"),
                None => value.to_string(),
            };
            result.insert(name.as_str(), merged);
        }
        result
    }
}

impl Transport for ReqwestTransport {
    fn send<'a>(
        &'a self,
        request: &'a HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>> {
        Box::pin(async move {
            let mut builder = self
                .client
                .request(Self::method(request.http_method), &request.url);

            for (name, value) in request.headers.iter() {
                builder = builder.header(name, value);
            }

            if let Some(body) = request.encoded_body() {
                builder = builder.body(body);
            }

            let res = builder.send().await?;

            let code = res.status().as_u16();
            let headers = Self::parse_response_headers(res.headers());
            let body = res.text().await.map_err(|e| {
                TransportError::new(TransportErrorKind::Body, e.to_string()).with_source(e)
            })?;

            Ok(HttpResponse::new(code, headers, body))
        })
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        let kind = if error.is_timeout() {
            TransportErrorKind::Timeout
        } else if error.is_connect() {
            TransportErrorKind::Connect
        } else if error.is_body() || error.is_decode() {
            TransportErrorKind::Body
        } else if error.is_builder() {
            TransportErrorKind::Request
        } else {
            TransportErrorKind::Other
        };
        Self::new(kind, error.to_string()).with_source(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue};

    #[test]
    fn test_method_mapping() {
        assert_eq!(ReqwestTransport::method(HttpMethod::Get), reqwest::Method::GET);
        assert_eq!(ReqwestTransport::method(HttpMethod::Patch), reqwest::Method::PATCH);
        assert_eq!(ReqwestTransport::method(HttpMethod::Head), reqwest::Method::HEAD);
    }

    #[test]
    fn test_parse_response_headers_joins_repeated_values() {
        let mut headers = HeaderMap::new();
        headers.append("set-cookie", HeaderValue::from_static("a=1"));
        headers.append("set-cookie", HeaderValue::from_static("b=2"));
        headers.insert("Retry-After", HeaderValue::from_static("900"));

        let parsed = ReqwestTransport::parse_response_headers(&headers);

        assert_eq!(parsed.get("Set-Cookie"), Some("a=1, b=2"));
        assert_eq!(parsed.get("retry-after"), Some("900"));
    }

    #[test]
    fn test_parse_response_headers_keeps_non_utf8_values() {
        let mut headers = HeaderMap::new();
        headers.insert("x-name", HeaderValue::from_bytes(b"caf\xe9").unwrap());

        let parsed = ReqwestTransport::parse_response_headers(&headers);

        assert_eq!(parsed.get("x-name"), Some("caf\u{fffd}"));
    }

    #[test]
    fn test_builder_error_maps_to_request_kind() {
        let error = reqwest::Client::new()
            .get("http://localhost/")
            .header("X-Bad", "line\nbreak")
            .build()
            .unwrap_err();

        let mapped = TransportError::from(error);

        assert_eq!(mapped.kind, TransportErrorKind::Request);
    }

    #[test]
    fn test_new_builds_client() {
        assert!(ReqwestTransport::new().is_ok());
    }
}
