//! Pagination types
//!
//! Run phases, per-page outcomes and controller configuration.

use crate::dataset::Dataset;
use crate::fetch::FetchError;
use std::time::Duration;

/// Where a pagination run is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Nothing fetched yet
    Init,
    /// Fetching page 1 to learn the page count
    DiscoveringTotal,
    /// Fetching pages 2..=N
    Iterating,
    /// Every page was attempted or skipped
    Done,
    /// Discovery failed; no dataset
    Aborted,
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::DiscoveringTotal => "discovering_total",
            Self::Iterating => "iterating",
            Self::Done => "done",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// What a single page contributed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Fetched with this many records
    Records(usize),
    /// Fetched, but the page held no records
    Empty,
    /// The fetch failed
    Failed(FetchError),
    /// Never attempted because the run deadline passed
    Skipped,
}

impl PageOutcome {
    /// Records the page contributed
    pub fn record_count(&self) -> usize {
        match self {
            Self::Records(n) => *n,
            _ => 0,
        }
    }

    /// True when the page came back, empty or not
    pub fn is_fetched(&self) -> bool {
        matches!(self, Self::Records(_) | Self::Empty)
    }

    /// Short label for logs and reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::Records(_) => "records",
            Self::Empty => "empty",
            Self::Failed(_) => "failed",
            Self::Skipped => "skipped",
        }
    }
}

/// Outcome of one page of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    /// 1-based page number
    pub page: u32,
    /// What happened
    pub outcome: PageOutcome,
}

/// Controller tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationConfig {
    /// Pages in flight at once after discovery (1 = strictly sequential)
    pub max_concurrency: usize,
    /// Overall time bound; pages not started before it are skipped
    pub deadline: Option<Duration>,
    /// Largest page count accepted from discovery
    pub max_pages: u32,
}

/// Default ceiling on the discovered page count
pub const DEFAULT_MAX_PAGES: u32 = 500;

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 1,
            deadline: None,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl PaginationConfig {
    /// Create a sequential config without a deadline
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of pages fetched concurrently (clamped to at least 1)
    #[must_use]
    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max.max(1);
        self
    }

    /// Set the run deadline
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set the page count ceiling (clamped to at least 1)
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }
}

/// Everything a finished pagination run produced
#[derive(Debug, Clone)]
pub struct PaginationResult {
    /// Page-ordered records with provenance
    pub dataset: Dataset,
    /// One report per page, ascending
    pub pages: Vec<PageReport>,
    /// Page count discovered from page 1
    pub total_pages: u32,
    /// Final phase, always [`RunPhase::Done`] for a returned result
    pub phase: RunPhase,
    /// Wall time spent fetching
    pub duration: Duration,
}

impl PaginationResult {
    /// Pages that failed, ascending
    pub fn failed_pages(&self) -> Vec<u32> {
        self.pages
            .iter()
            .filter(|p| matches!(p.outcome, PageOutcome::Failed(_)))
            .map(|p| p.page)
            .collect()
    }

    /// True when every page was fetched
    pub fn is_complete(&self) -> bool {
        self.pages.iter().all(|p| p.outcome.is_fetched())
    }
}
