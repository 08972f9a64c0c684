//! Tests for the page fetcher

use super::*;
use crate::error::Error;
use crate::http::{HttpClient, HttpClientConfig, BROWSER_USER_AGENT};
use crate::params::{EncodedToken, ParameterEncoder};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn client() -> HttpClient {
    HttpClient::with_config(
        HttpClientConfig::builder()
            .headers(default_headers())
            .timeout(Duration::from_secs(2))
            .no_rate_limit()
            .build(),
    )
    .unwrap()
}

fn fetcher_for(server: &MockServer) -> HttpPageFetcher {
    HttpPageFetcher::new(&format!("{}/indexCall/GetPortfolioDay", server.uri()), client()).unwrap()
}

/// Exact header match; the stock matcher splits values on commas
fn header_is(name: &'static str, expected: &'static str) -> impl Fn(&Request) -> bool {
    move |req: &Request| {
        req.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == expected)
    }
}

fn page_one() -> EncodedToken {
    ParameterEncoder::default().encode(1).unwrap()
}

#[test]
fn test_url_for_appends_token_segment() {
    let fetcher = HttpPageFetcher::portfolio(client()).unwrap();
    let token = page_one();
    let url = fetcher.url_for(&token);
    assert_eq!(
        url.as_str(),
        format!("{DEFAULT_BASE_URL}/{}", token.as_str())
    );
}

#[test]
fn test_url_for_trailing_slash_and_unsafe_characters() {
    let fetcher = HttpPageFetcher::new("https://example.com/api/", client()).unwrap();
    let url = fetcher.url_for(&EncodedToken::new("ab/c+d=="));
    assert_eq!(url.as_str(), "https://example.com/api/ab%2Fc+d==");
}

#[test]
fn test_new_rejects_bad_base_url() {
    let err = HttpPageFetcher::new("not a url", client()).unwrap_err();
    assert!(matches!(err, Error::InvalidUrl(_)));

    let err = HttpPageFetcher::new("mailto:someone@example.com", client()).unwrap_err();
    assert!(matches!(err, Error::InvalidConfigValue { .. }));
}

#[test]
fn test_fetch_error_from_client_error() {
    assert_eq!(
        FetchError::from(Error::http_status(503, "busy")),
        FetchError::Http { status: 503 }
    );
    assert_eq!(
        FetchError::from(Error::RateLimited {
            retry_after_seconds: 5
        }),
        FetchError::Http { status: 429 }
    );
    assert!(matches!(
        FetchError::from(Error::Timeout { timeout_ms: 100 }),
        FetchError::Network { .. }
    ));
    assert_eq!(FetchError::parse("x").kind(), "parse");
}

#[tokio::test]
async fn test_fetch_sends_required_headers() {
    let server = MockServer::start().await;
    let fetcher = fetcher_for(&server);
    let token = page_one();

    Mock::given(method("GET"))
        .and(path(fetcher.url_for(&token).path()))
        .and(header_is("accept", DEFAULT_ACCEPT))
        .and(header_is("accept-language", DEFAULT_ACCEPT_LANGUAGE))
        .and(header_is("referer", DEFAULT_REFERER))
        .and(header_is("user-agent", BROWSER_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": {"totalPages": 2},
            "results": [{"cod": "PETR4"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = fetcher.fetch(&token).await.unwrap();
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.records[0]["cod"], "PETR4");
}

#[tokio::test]
async fn test_fetch_server_error_is_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let err = fetcher_for(&server).fetch(&page_one()).await.unwrap_err();
    assert_eq!(err, FetchError::Http { status: 500 });
}

#[tokio::test]
async fn test_fetch_non_200_success_is_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let err = fetcher_for(&server).fetch(&page_one()).await.unwrap_err();
    assert_eq!(err, FetchError::Http { status: 204 });
}

#[tokio::test]
async fn test_fetch_malformed_body_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = fetcher_for(&server).fetch(&page_one()).await.unwrap_err();
    assert!(matches!(err, FetchError::Parse { .. }));
}

#[tokio::test]
async fn test_fetch_unreachable_host_is_network_error() {
    let fetcher = HttpPageFetcher::new("http://127.0.0.1:9/GetPortfolioDay", client()).unwrap();
    let err = fetcher.fetch(&page_one()).await.unwrap_err();
    assert!(matches!(err, FetchError::Network { .. }));
}
