//! End-to-end tests of [`HttpClient`] over the reqwest transport.
//!
//! A `wiremock` server stands in for the remote API.

use std::time::Duration;

use http_interceptors::interceptors::{HeaderInterceptor, TracingInterceptor};
use http_interceptors::transport::TransportErrorKind;
use http_interceptors::{
    BaseUrl, ClientConfig, DataType, HttpClient, HttpError, HttpMethod, HttpRequest,
    RequestOptions, RetryPolicy,
};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, policy: RetryPolicy) -> HttpClient {
    let config = ClientConfig::builder()
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .retry_policy(policy)
        .build()
        .unwrap();
    HttpClient::new(config).unwrap()
}

fn quick_retries() -> RetryPolicy {
    RetryPolicy::new()
        .max_attempts(3)
        .base_delay(Duration::from_millis(10))
}

#[tokio::test]
async fn test_get_resolves_base_url_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/react-store-products"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "rec1"}])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, quick_retries());
    let request = HttpRequest::builder(HttpMethod::Get, "/react-store-products")
        .query_param("page", "2")
        .build()
        .unwrap();

    let response = assert_ok!(client.send(request).await);

    let products: serde_json::Value = response.json().unwrap();
    assert_eq!(products[0]["id"], "rec1");
}

#[tokio::test]
async fn test_default_and_interceptor_headers_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("accept", "application/json"))
        .and(header("authorization", "Bearer abc"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, quick_retries());
    client.register_request_interceptor(HeaderInterceptor::new("Authorization", "Bearer abc"));
    client.register_request_interceptor(TracingInterceptor);
    client.register_response_interceptor(TracingInterceptor);

    let request = HttpRequest::builder(HttpMethod::Get, "me").build().unwrap();
    let response = assert_ok!(client.send(request).await);
    assert_eq!(response.code, 204);
}

#[tokio::test]
async fn test_post_sends_json_body_with_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/products"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"title": "Chair"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 7})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, quick_retries());
    let request = HttpRequest::builder(HttpMethod::Post, "/products")
        .body(json!({"title": "Chair"}))
        .body_type(DataType::Json)
        .build()
        .unwrap();

    let response = assert_ok!(client.send(request).await);
    assert_eq!(response.code, 201);
}

#[tokio::test]
async fn test_service_unavailable_is_retried_until_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/busy"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/busy"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, quick_retries());
    let request = HttpRequest::builder(HttpMethod::Get, "/busy").build().unwrap();
    let response = assert_ok!(client.send(request).await);

    assert_eq!(response.body, "ok");
}

#[tokio::test]
async fn test_rate_limit_retry_after_header_is_read() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/limited"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/limited"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(
        &server,
        RetryPolicy::new()
            .max_attempts(2)
            .base_delay(Duration::from_secs(30))
            .max_delay(Duration::from_secs(30)),
    );

    // A 30s backoff would time out this test; Retry-After: 0 takes precedence.
    let request = HttpRequest::builder(HttpMethod::Get, "/limited").build().unwrap();
    let response = tokio::time::timeout(Duration::from_secs(5), client.send(request))
        .await
        .expect("Retry-After should replace backoff");

    assert_eq!(assert_ok!(response).code, 200);
}

#[tokio::test]
async fn test_not_found_is_returned_after_one_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/react-store-productss"))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("X-Request-Id", "req-42")
                .set_body_string("Not Found"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, quick_retries());
    let request = HttpRequest::builder(HttpMethod::Get, "/react-store-productss")
        .build()
        .unwrap();

    let error = assert_err!(client.send(request).await);

    match error {
        HttpError::Response(e) => {
            assert_eq!(e.code, 404);
            assert_eq!(e.error_reference.as_deref(), Some("req-42"));
            assert_eq!(e.message, "Request failed with status code 404: Not Found");
        }
        other => panic!("expected Response, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_exhausts_single_attempt() {
    let config = ClientConfig::builder()
        .base_url(BaseUrl::new("http://127.0.0.1:1").unwrap())
        .retry_policy(RetryPolicy::no_retry())
        .build()
        .unwrap();
    let client = HttpClient::new(config).unwrap();

    let request = HttpRequest::builder(HttpMethod::Get, "/").build().unwrap();
    let error = assert_err!(client.send(request).await);

    assert!(matches!(error, HttpError::MaxRetries(ref e) if e.tries == 1));
    match error.last_failure() {
        HttpError::Transport(failure) => {
            assert_eq!(failure.source.kind, TransportErrorKind::Connect);
            assert_eq!(failure.request.url, "http://127.0.0.1:1");
        }
        other => panic!("expected Transport, got {other:?}"),
    }
}

#[tokio::test]
async fn test_header_with_line_break_is_rejected_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, quick_retries());
    client.register_request_interceptor(HeaderInterceptor::new("X-Bad", "line\nbreak"));

    let request = HttpRequest::builder(HttpMethod::Get, "/me").build().unwrap();
    let error = assert_err!(client.send(request).await);

    assert!(matches!(error, HttpError::InvalidRequest(_)), "{error:?}");
}

#[tokio::test]
async fn test_slow_response_hits_attempt_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let client = client_for(&server, RetryPolicy::no_retry());
    let request = HttpRequest::builder(HttpMethod::Get, "/slow").build().unwrap();
    let options = RequestOptions::new().timeout(Duration::from_millis(50));

    let error = assert_err!(client.request(request, options).await);

    assert!(matches!(
        error.last_failure(),
        HttpError::Transport(f) if f.source.is_timeout()
    ));
}
