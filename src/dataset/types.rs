//! Dataset types

use crate::types::RawRecord;
use serde::Serialize;

/// A raw record tagged with the page it came from
#[derive(Debug, Clone, PartialEq)]
pub struct PageRecord {
    /// 1-based page number
    pub page: u32,
    /// The record as returned by the API
    pub record: RawRecord,
}

/// Counters describing how complete a dataset is
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatasetStats {
    /// Page count reported by the API
    pub total_pages: u32,
    /// Pages that contributed a (possibly empty) batch
    pub pages_fetched: u32,
    /// Records across all pages
    pub records: usize,
    /// Pages that were fetched but held no records
    pub empty_pages: Vec<u32>,
    /// Pages whose fetch failed
    pub failed_pages: Vec<u32>,
    /// Pages never attempted because the run ran out of time
    pub skipped_pages: Vec<u32>,
}

impl DatasetStats {
    /// True when every page was fetched
    pub fn is_complete(&self) -> bool {
        self.failed_pages.is_empty() && self.skipped_pages.is_empty()
    }
}

/// The merged, page-ordered result of one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Records in ascending page order
    pub records: Vec<PageRecord>,
    /// Completeness counters
    pub stats: DatasetStats,
}

impl Dataset {
    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no page contributed a record
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct page numbers present, ascending
    pub fn pages(&self) -> Vec<u32> {
        let mut pages: Vec<u32> = self.records.iter().map(|r| r.page).collect();
        pages.dedup();
        pages
    }
}
