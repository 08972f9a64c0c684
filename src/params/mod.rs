//! Request parameter encoding
//!
//! The portfolio API takes its paging parameters as a single opaque path
//! segment: the base64 of a small JSON object. This module builds that token
//! from a page number and can read one back.

mod encoder;
mod types;

pub use encoder::{ParameterEncoder, DEFAULT_INDEX, DEFAULT_LANGUAGE, DEFAULT_PAGE_SIZE};
pub use types::{EncodedToken, PageRequest};
