//! Response decoder module
//!
//! Turns a portfolio response body into a validated [`PageResponse`].
//!
//! # Overview
//!
//! The API answers every page with the same envelope:
//!
//! ```text
//! { "page": { "pageNumber": 1, "pageSize": 20, "totalRecords": 86, "totalPages": 5 },
//!   "header": { ... },
//!   "results": [ { "segment": null, "cod": "ALOS3", ... }, ... ] }
//! ```
//!
//! Decoding never panics and never indexes blindly into the JSON. Anything
//! that does not fit the envelope becomes a [`FetchError::Parse`].
//!
//! [`FetchError::Parse`]: crate::fetch::FetchError::Parse

mod decoders;
mod types;

pub use decoders::decode_page;
pub use types::PageResponse;
