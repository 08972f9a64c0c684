//! Snapshot configuration
//!
//! Every field has a default, so an empty file (or no file at all) gives a
//! working run against the public IBOV endpoint. CLI flags are applied on top
//! of the loaded values.

use crate::error::{Error, Result};
use crate::fetch::{default_headers, HttpPageFetcher, DEFAULT_BASE_URL};
use crate::http::{HttpClient, HttpClientConfig, RateLimiterConfig, BROWSER_USER_AGENT};
use crate::pagination::{PaginationConfig, DEFAULT_MAX_PAGES};
use crate::params::{ParameterEncoder, DEFAULT_INDEX, DEFAULT_LANGUAGE, DEFAULT_PAGE_SIZE};
use crate::schema::SchemaMapper;
use crate::types::{BackoffType, LogLevel, SinkFormat, ViolationPolicy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete configuration for one snapshot job
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Upstream API and index selection
    #[serde(default)]
    pub source: SourceConfig,

    /// HTTP client behaviour
    #[serde(default)]
    pub http: HttpConfig,

    /// Run-level behaviour
    #[serde(default)]
    pub run: RunConfig,

    /// Where and how the snapshot is written
    #[serde(default)]
    pub sink: SinkConfig,

    /// Process-wide logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SnapshotConfig {
    /// Load and validate a YAML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate YAML config text
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot
    pub fn validate(&self) -> Result<()> {
        let base_url = Url::parse(&self.source.base_url)
            .map_err(|e| Error::invalid_value("source.base_url", e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::invalid_value(
                "source.base_url",
                "must be a hierarchical http(s) URL",
            ));
        }
        if self.source.index.trim().is_empty() {
            return Err(Error::invalid_value("source.index", "must not be empty"));
        }
        if self.source.page_size == 0 {
            return Err(Error::invalid_value("source.page_size", "must be at least 1"));
        }
        if self.http.timeout_secs == 0 {
            return Err(Error::invalid_value("http.timeout_secs", "must be at least 1"));
        }
        if self.run.max_concurrency == 0 {
            return Err(Error::invalid_value("run.max_concurrency", "must be at least 1"));
        }
        if self.run.max_pages == 0 {
            return Err(Error::invalid_value("run.max_pages", "must be at least 1"));
        }
        if self.sink.dataset_name.trim().is_empty() {
            return Err(Error::invalid_value("sink.dataset_name", "must not be empty"));
        }
        if self.sink.destination.trim().is_empty() {
            return Err(Error::invalid_value("sink.destination", "must not be empty"));
        }
        self.sink.delimiter_byte()?;
        Ok(())
    }

    /// Encoder for the configured index
    pub fn encoder(&self) -> ParameterEncoder {
        ParameterEncoder::new(
            &self.source.index,
            self.source.page_size,
            &self.source.language,
        )
    }

    /// HTTP client settings: default headers, overrides, throttle and retries
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .headers(default_headers())
            .headers(self.source.headers.clone())
            .user_agent(&self.source.user_agent)
            .timeout(Duration::from_secs(self.http.timeout_secs))
            .max_retries(self.http.max_retries)
            .backoff(
                self.http.backoff,
                Duration::from_millis(self.http.initial_backoff_ms),
                Duration::from_millis(self.http.max_backoff_ms),
            );

        builder = if self.http.throttle_ms == 0 {
            builder.no_rate_limit()
        } else {
            builder.rate_limit(RateLimiterConfig::every(Duration::from_millis(
                self.http.throttle_ms,
            )))
        };

        builder.build()
    }

    /// Fetcher for the configured endpoint
    pub fn build_fetcher(&self) -> Result<HttpPageFetcher> {
        let client = HttpClient::with_config(self.http_client_config())?;
        HttpPageFetcher::new(&self.source.base_url, client)
    }

    /// Controller tuning
    pub fn pagination_config(&self) -> PaginationConfig {
        let config = PaginationConfig::new()
            .with_max_concurrency(self.run.max_concurrency)
            .with_max_pages(self.run.max_pages);
        match self.run.deadline_secs {
            Some(secs) => config.with_deadline(Duration::from_secs(secs)),
            None => config,
        }
    }

    /// Mapper with the configured violation policy
    pub fn mapper(&self) -> SchemaMapper {
        SchemaMapper::new(self.run.on_schema_violation)
    }
}

// ============================================================================
// Source
// ============================================================================

/// Upstream API and index selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Endpoint the token is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Index code (e.g., "IBOV", "IBXX")
    #[serde(default = "default_index")]
    pub index: String,

    /// Locale sent in the request parameters
    #[serde(default = "default_language")]
    pub language: String,

    /// Records per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Extra headers; same-named defaults are replaced
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            index: default_index(),
            language: default_language(),
            page_size: default_page_size(),
            headers: HashMap::new(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_index() -> String {
    DEFAULT_INDEX.to_string()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_user_agent() -> String {
    BROWSER_USER_AGENT.to_string()
}

// ============================================================================
// HTTP
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Minimum spacing between request starts; 0 disables the throttle
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,

    /// Retries per request (0 = single attempt)
    #[serde(default)]
    pub max_retries: u32,

    /// Backoff strategy between retries
    #[serde(default)]
    pub backoff: BackoffType,

    /// First backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Backoff ceiling in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            throttle_ms: default_throttle_ms(),
            max_retries: 0,
            backoff: BackoffType::default(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_throttle_ms() -> u64 {
    1000
}

fn default_initial_backoff_ms() -> u64 {
    500
}

fn default_max_backoff_ms() -> u64 {
    10_000
}

// ============================================================================
// Run
// ============================================================================

/// Run-level behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Pages in flight at once after discovery
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Overall time bound in seconds
    #[serde(default)]
    pub deadline_secs: Option<u64>,

    /// Largest page count accepted from discovery
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// What to do with records that do not fit the target schema
    #[serde(default)]
    pub on_schema_violation: ViolationPolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            deadline_secs: None,
            max_pages: default_max_pages(),
            on_schema_violation: ViolationPolicy::default(),
        }
    }
}

fn default_max_concurrency() -> usize {
    1
}

fn default_max_pages() -> u32 {
    DEFAULT_MAX_PAGES
}

// ============================================================================
// Sink
// ============================================================================

/// Sink configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Output format
    #[serde(default)]
    pub format: SinkFormat,

    /// Local directory or s3://, r2://, gs://, az:// URL
    #[serde(default = "default_destination")]
    pub destination: String,

    /// File name stem; the run date is appended
    #[serde(default = "default_dataset_name")]
    pub dataset_name: String,

    /// Field delimiter for the delimited format
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            format: SinkFormat::default(),
            destination: default_destination(),
            dataset_name: default_dataset_name(),
            delimiter: default_delimiter(),
        }
    }
}

impl SinkConfig {
    /// The delimiter as the single byte the csv writer takes
    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter.as_bytes() {
            [byte] => Ok(*byte),
            _ => Err(Error::invalid_value(
                "sink.delimiter",
                format!("'{}' is not a single ASCII character", self.delimiter),
            )),
        }
    }
}

fn default_destination() -> String {
    "./data".to_string()
}

fn default_dataset_name() -> String {
    "dados_ibov".to_string()
}

fn default_delimiter() -> String {
    ",".to_string()
}

// ============================================================================
// Logging
// ============================================================================

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level; RUST_LOG takes precedence
    #[serde(default)]
    pub level: LogLevel,

    /// Directory for a dated log file, in addition to stderr
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SnapshotConfig::from_yaml("").unwrap();
        assert_eq!(config, SnapshotConfig::default());
        assert_eq!(config.source.index, "IBOV");
        assert_eq!(config.source.page_size, 20);
        assert_eq!(config.http.throttle_ms, 1000);
        assert_eq!(config.http.max_retries, 0);
        assert_eq!(config.run.max_concurrency, 1);
        assert_eq!(config.run.max_pages, 500);
        assert_eq!(config.sink.format, SinkFormat::Csv);
        assert_eq!(config.sink.dataset_name, "dados_ibov");
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
source:
  index: IBXX
  page_size: 50
  headers:
    referer: https://example.com/
http:
  timeout_secs: 10
  throttle_ms: 0
  max_retries: 2
  backoff: linear
run:
  max_concurrency: 3
  deadline_secs: 120
  max_pages: 40
  on_schema_violation: abort
sink:
  format: parquet
  destination: s3://bucket/ibov
  delimiter: ";"
logging:
  level: debug
  directory: /var/log/ibov
"#;
        let config = SnapshotConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.source.index, "IBXX");
        assert_eq!(config.source.page_size, 50);
        assert_eq!(config.source.language, "pt-br");
        assert_eq!(config.http.backoff, BackoffType::Linear);
        assert_eq!(config.run.on_schema_violation, ViolationPolicy::Abort);
        assert_eq!(config.sink.format, SinkFormat::Parquet);
        assert_eq!(config.sink.delimiter_byte().unwrap(), b';');
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(
            config.logging.directory,
            Some(PathBuf::from("/var/log/ibov"))
        );

        let pagination = config.pagination_config();
        assert_eq!(pagination.max_concurrency, 3);
        assert_eq!(pagination.deadline, Some(Duration::from_secs(120)));
        assert_eq!(pagination.max_pages, 40);

        let encoder = config.encoder();
        assert_eq!(encoder.index(), "IBXX");
        assert_eq!(encoder.page_size(), 50);
    }

    #[test]
    fn test_http_client_config_merges_headers() {
        let mut config = SnapshotConfig::default();
        config
            .source
            .headers
            .insert("referer".to_string(), "https://example.com/".to_string());

        let http = config.http_client_config();
        assert_eq!(
            http.default_headers.get("referer").map(String::as_str),
            Some("https://example.com/")
        );
        assert!(http.default_headers.contains_key("accept"));
        assert!(http.default_headers.contains_key("accept-language"));
        assert_eq!(
            http.rate_limit,
            Some(RateLimiterConfig::every(Duration::from_secs(1)))
        );
        assert_eq!(http.max_retries, 0);
    }

    #[test]
    fn test_zero_throttle_disables_rate_limit() {
        let config = SnapshotConfig::from_yaml("http:\n  throttle_ms: 0\n").unwrap();
        assert!(config.http_client_config().rate_limit.is_none());
    }

    #[test]
    fn test_validation_errors() {
        let cases = [
            ("source:\n  page_size: 0\n", "source.page_size"),
            ("source:\n  base_url: not a url\n", "source.base_url"),
            ("source:\n  index: ''\n", "source.index"),
            ("run:\n  max_concurrency: 0\n", "run.max_concurrency"),
            ("run:\n  max_pages: 0\n", "run.max_pages"),
            ("sink:\n  dataset_name: ' '\n", "sink.dataset_name"),
            ("sink:\n  delimiter: ';;'\n", "sink.delimiter"),
        ];

        for (yaml, expected_field) in cases {
            match SnapshotConfig::from_yaml(yaml) {
                Err(Error::InvalidConfigValue { field, .. }) => assert_eq!(field, expected_field),
                other => panic!("Expected invalid {expected_field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_malformed_yaml() {
        let err = SnapshotConfig::from_yaml("source: [unclosed").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.yaml");
        std::fs::write(&path, "sink:\n  dataset_name: ibxx\n").unwrap();

        let config = SnapshotConfig::load(&path).unwrap();
        assert_eq!(config.sink.dataset_name, "ibxx");

        let err = SnapshotConfig::load(dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_build_fetcher_uses_base_url() {
        let config = SnapshotConfig::default();
        let fetcher = config.build_fetcher().unwrap();
        assert_eq!(fetcher.base_url().as_str(), DEFAULT_BASE_URL);
    }
}
