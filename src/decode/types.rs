//! Decoded page types

use crate::types::RawRecord;

/// One successfully fetched and validated page
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse {
    /// HTTP status the page was served with (always 200 once decoded)
    pub status_code: u16,
    /// Total number of pages the API reports for the listing
    pub total_pages: u32,
    /// Records on this page, in API order
    pub records: Vec<RawRecord>,
}

impl PageResponse {
    /// Number of records on the page
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the page carried no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
