//! Parameter encoder implementation

use super::types::{EncodedToken, PageRequest};
use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::debug;

/// Default index code
pub const DEFAULT_INDEX: &str = "IBOV";

/// Default page size the API is queried with
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Default locale
pub const DEFAULT_LANGUAGE: &str = "pt-br";

/// Builds per-page request tokens from fixed index-selection parameters
///
/// Only the page number varies between calls. `encode` is a pure function of
/// it, so the same page always yields the same token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterEncoder {
    index: String,
    page_size: u32,
    language: String,
}

impl Default for ParameterEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX, DEFAULT_PAGE_SIZE, DEFAULT_LANGUAGE)
    }
}

impl ParameterEncoder {
    /// Create an encoder for an index, page size and locale
    pub fn new(index: impl Into<String>, page_size: u32, language: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            page_size,
            language: language.into(),
        }
    }

    /// Index code this encoder selects
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Page size this encoder requests
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Locale this encoder requests
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Build the request for a page
    pub fn request(&self, page_number: u32) -> PageRequest {
        PageRequest {
            language: self.language.clone(),
            page_number,
            page_size: self.page_size,
            index: self.index.clone(),
        }
    }

    /// Encode the request for `page_number` (1-based) into a token
    pub fn encode(&self, page_number: u32) -> Result<EncodedToken> {
        if page_number == 0 {
            return Err(Error::encoding(0, "page numbers start at 1"));
        }
        if self.page_size == 0 {
            return Err(Error::encoding(page_number, "page size must be positive"));
        }

        let json = serde_json::to_string(&self.request(page_number))
            .map_err(|e| Error::encoding(page_number, e.to_string()))?;
        let token = EncodedToken::new(STANDARD.encode(json.as_bytes()));

        debug!(
            "Encoded parameters for page {page_number}: {}",
            truncate(token.as_str(), 50)
        );
        Ok(token)
    }

    /// Decode a token back into the request it was built from
    pub fn decode(token: &EncodedToken) -> Result<PageRequest> {
        let bytes = STANDARD
            .decode(token.as_str().trim())
            .map_err(|e| Error::encoding(0, format!("token is not valid base64: {e}")))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| Error::encoding(0, format!("token does not hold page parameters: {e}")))
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
