//! Fetch outcome classification

use crate::error::Error;
use thiserror::Error;

/// Why a single page contributed no records
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The API answered with a status other than 200
    #[error("HTTP status {status}")]
    Http { status: u16 },

    /// Transport-level failure: timeout, DNS, connection reset, body read
    #[error("network error: {message}")]
    Network { message: String },

    /// 200 with a body that does not fit the response envelope
    #[error("malformed response: {message}")]
    Parse { message: String },
}

impl FetchError {
    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Short label for logs and reports
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Http { .. } => "http",
            Self::Network { .. } => "network",
            Self::Parse { .. } => "parse",
        }
    }
}

impl From<Error> for FetchError {
    fn from(err: Error) -> Self {
        match err {
            Error::HttpStatus { status, .. } => Self::Http { status },
            Error::RateLimited { .. } => Self::Http { status: 429 },
            Error::Timeout { timeout_ms } => {
                Self::network(format!("request timed out after {timeout_ms}ms"))
            }
            Error::Http(e) => Self::network(e.to_string()),
            other => Self::network(other.to_string()),
        }
    }
}
