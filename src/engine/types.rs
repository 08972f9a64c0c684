//! Engine types
//!
//! Run status, statistics and the final report of a snapshot run.

use crate::output::SinkReceipt;
use crate::pagination::{PageOutcome, PageReport};
use crate::schema::SchemaViolation;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Value};

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Every page fetched and every record written
    Complete,
    /// Written, but some pages failed or were skipped, or records were dropped
    Partial,
    /// Nothing written: discovery or encoding failed
    Failed,
}

impl RunStatus {
    /// Process exit code for this status
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Complete => 0,
            Self::Partial => 2,
            Self::Failed => 1,
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Complete => write!(f, "complete"),
            Self::Partial => write!(f, "partial"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Statistics from a snapshot run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Pages that came back, empty or not
    pub pages_fetched: usize,
    /// Pages that came back with no records
    pub pages_empty: usize,
    /// Pages whose fetch failed
    pub pages_failed: usize,
    /// Pages skipped by the deadline
    pub pages_skipped: usize,
    /// Records received from the API
    pub records_fetched: usize,
    /// Records handed to the sink
    pub records_written: usize,
    /// Records dropped by the schema mapper
    pub records_dropped: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl RunStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one page report
    pub fn add_page(&mut self, outcome: &PageOutcome) {
        match outcome {
            PageOutcome::Records(n) => {
                self.pages_fetched += 1;
                self.records_fetched += n;
            }
            PageOutcome::Empty => {
                self.pages_fetched += 1;
                self.pages_empty += 1;
            }
            PageOutcome::Failed(_) => self.pages_failed += 1,
            PageOutcome::Skipped => self.pages_skipped += 1,
        }
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}

/// Everything one run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    /// How the run ended
    pub status: RunStatus,
    /// Date stamped on the output
    pub run_date: NaiveDate,
    /// Page count from discovery (0 when discovery failed)
    pub total_pages: u32,
    /// One report per page attempted or skipped
    pub pages: Vec<PageReport>,
    /// Records dropped by the mapper
    pub violations: Vec<SchemaViolation>,
    /// What the sink wrote, absent on failure
    pub receipt: Option<SinkReceipt>,
    /// Why the run failed
    pub failure: Option<String>,
    /// Counters
    pub stats: RunStats,
}

impl RunReport {
    /// Pages matching `pred`, ascending
    fn pages_where(&self, pred: impl Fn(&PageOutcome) -> bool) -> Vec<u32> {
        self.pages
            .iter()
            .filter(|p| pred(&p.outcome))
            .map(|p| p.page)
            .collect()
    }

    /// Pages whose fetch failed
    pub fn failed_pages(&self) -> Vec<u32> {
        self.pages_where(|o| matches!(o, PageOutcome::Failed(_)))
    }

    /// Pages skipped by the deadline
    pub fn skipped_pages(&self) -> Vec<u32> {
        self.pages_where(|o| matches!(o, PageOutcome::Skipped))
    }

    /// Pages that came back empty
    pub fn empty_pages(&self) -> Vec<u32> {
        self.pages_where(|o| matches!(o, PageOutcome::Empty))
    }

    /// One-line machine-readable summary
    pub fn summary(&self) -> Value {
        json!({
            "status": self.status,
            "run_date": self.run_date.format("%Y-%m-%d").to_string(),
            "total_pages": self.total_pages,
            "failed_pages": self.failed_pages(),
            "skipped_pages": self.skipped_pages(),
            "empty_pages": self.empty_pages(),
            "records_fetched": self.stats.records_fetched,
            "records_written": self.stats.records_written,
            "records_dropped": self.stats.records_dropped,
            "location": self.receipt.as_ref().map(|r| r.location.clone()),
            "bytes": self.receipt.as_ref().map(|r| r.bytes),
            "failure": self.failure,
            "duration_ms": self.stats.duration_ms,
        })
    }
}
