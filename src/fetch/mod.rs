//! Page fetching
//!
//! One fetch is one HTTP GET for one encoded token. The outcome is either a
//! validated [`PageResponse`](crate::decode::PageResponse) or a classified
//! [`FetchError`]. Per-page failures never abort a run, so fetchers report
//! them as values instead of run-level [`Error`](crate::Error)s.

mod fetcher;
mod types;

pub use fetcher::{
    default_headers, HttpPageFetcher, PageFetcher, DEFAULT_ACCEPT, DEFAULT_ACCEPT_LANGUAGE,
    DEFAULT_BASE_URL, DEFAULT_REFERER,
};
pub use types::FetchError;

#[cfg(test)]
mod tests;
