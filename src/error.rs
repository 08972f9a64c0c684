//! Error types for the snapshot crate
//!
//! Run-level failures are variants of [`Error`]. Per-page failures are
//! classified separately as [`crate::fetch::FetchError`] and never abort a run
//! on their own.

use crate::fetch::FetchError;
use thiserror::Error;

/// The main error type for the snapshot crate
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Run-Level Errors
    // ============================================================================
    #[error("Failed to encode request parameters for page {page}: {message}")]
    Encoding { page: u32, message: String },

    #[error("Page count discovery failed: {0}")]
    Discovery(DiscoveryFailure),

    #[error("Accumulator error: {message}")]
    Accumulator { message: String },

    #[error("Schema violation on page {page}, record {position}, field '{field}': {message}")]
    SchemaViolation {
        page: u32,
        position: usize,
        field: String,
        message: String,
    },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Max retries ({max_retries}) exceeded")]
    MaxRetriesExceeded { max_retries: u32 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Output Errors
    // ============================================================================
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Why page-count discovery aborted the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryFailure {
    /// The page 1 fetch itself failed
    Fetch(FetchError),
    /// Page 1 answered but reported zero total pages
    NoPages,
    /// Page 1 reported more pages than the run allows
    TooManyPages { reported: u32, limit: u32 },
}

impl std::fmt::Display for DiscoveryFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetch(e) => write!(f, "page 1 fetch failed: {e}"),
            Self::NoPages => write!(f, "API reported zero total pages"),
            Self::TooManyPages { reported, limit } => {
                write!(f, "API reported {reported} total pages, limit is {limit}")
            }
        }
    }
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an encoding error
    pub fn encoding(page: u32, message: impl Into<String>) -> Self {
        Self::Encoding {
            page,
            message: message.into(),
        }
    }

    /// Create an accumulator error
    pub fn accumulator(message: impl Into<String>) -> Self {
        Self::Accumulator {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// True for failures that end the run without producing a dataset
    pub fn is_total_failure(&self) -> bool {
        matches!(self, Error::Discovery(_) | Error::Encoding { .. })
    }
}

/// Result type alias for the snapshot crate
pub type Result<T> = std::result::Result<T, Error>;
