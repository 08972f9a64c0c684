//! Page request and token types

use serde::{Deserialize, Serialize};

/// Parameters for one page of the portfolio listing
///
/// Field order is the serialisation order: `language, pageNumber, pageSize,
/// index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// Locale the API renders text in
    pub language: String,
    /// 1-based page index
    pub page_number: u32,
    /// Records per page
    pub page_size: u32,
    /// Index code, e.g. `IBOV`
    pub index: String,
}

/// Base64 request token, used only as a URL path segment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedToken(String);

impl EncodedToken {
    /// Wrap an already-encoded token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The token text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the token text
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for EncodedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EncodedToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
