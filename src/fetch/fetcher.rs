//! Page fetcher trait and HTTP implementation

use super::types::FetchError;
use crate::decode::{decode_page, PageResponse};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::params::EncodedToken;
use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

/// Portfolio-of-the-day endpoint; the token is appended as a path segment
pub const DEFAULT_BASE_URL: &str =
    "https://sistemaswebb3-listados.b3.com.br/indexProxy/indexCall/GetPortfolioDay";

/// Content negotiation the upstream expects
pub const DEFAULT_ACCEPT: &str = "application/json, text/plain, */*";

/// Locale negotiation the upstream expects
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "pt-BR,pt;q=0.9,en-US;q=0.8,en;q=0.7";

/// Referer matching the origin site
pub const DEFAULT_REFERER: &str = "https://sistemaswebb3-listados.b3.com.br/";

/// Header set sent with every page request, user agent aside
///
/// `accept-encoding` is absent on purpose: reqwest sets it and decompresses
/// the body only when it owns that header.
pub fn default_headers() -> Vec<(String, String)> {
    vec![
        ("accept".to_string(), DEFAULT_ACCEPT.to_string()),
        (
            "accept-language".to_string(),
            DEFAULT_ACCEPT_LANGUAGE.to_string(),
        ),
        ("referer".to_string(), DEFAULT_REFERER.to_string()),
    ]
}

/// Fetches one page for an encoded token
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Issue exactly one request for `token` and classify the outcome
    async fn fetch(&self, token: &EncodedToken) -> std::result::Result<PageResponse, FetchError>;
}

/// [`PageFetcher`] backed by the throttled [`HttpClient`]
#[derive(Debug)]
pub struct HttpPageFetcher {
    client: HttpClient,
    base_url: Url,
}

impl HttpPageFetcher {
    /// Create a fetcher for `base_url`
    pub fn new(base_url: &str, client: HttpClient) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::invalid_value(
                "source.base_url",
                format!("'{base_url}' cannot take path segments"),
            ));
        }
        Ok(Self { client, base_url })
    }

    /// Create a fetcher for the default portfolio endpoint
    pub fn portfolio(client: HttpClient) -> Result<Self> {
        Self::new(DEFAULT_BASE_URL, client)
    }

    /// The endpoint tokens are appended to
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full request URL for a token
    pub fn url_for(&self, token: &EncodedToken) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(token.as_str());
        }
        url
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, token: &EncodedToken) -> std::result::Result<PageResponse, FetchError> {
        let url = self.url_for(token);
        let response = self.client.get(url.as_str()).await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::network(format!("failed to read body: {e}")))?;
        decode_page(status.as_u16(), &body)
    }
}
