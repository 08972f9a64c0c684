//! Execution engine module
//!
//! Runs one snapshot end to end: paginate, map, write.
//!
//! # Overview
//!
//! - `SnapshotEngine` - wires a controller, a mapper and a sink
//! - `RunReport` - what happened, page by page
//! - `RunStatus` - complete, partial or failed

mod types;

pub use types::{RunReport, RunStats, RunStatus};

use crate::config::SnapshotConfig;
use crate::error::{DiscoveryFailure, Error, Result};
use crate::fetch::{HttpPageFetcher, PageFetcher};
use crate::output::{build_sink, SinkWriter};
use crate::pagination::{PageOutcome, PageReport, PaginationController};
use crate::schema::SchemaMapper;
use chrono::{Local, NaiveDate};
use std::time::Instant;
use tracing::{error, info, warn};

/// Snapshot engine for one run
pub struct SnapshotEngine<F: PageFetcher> {
    controller: PaginationController<F>,
    mapper: SchemaMapper,
    sink: Box<dyn SinkWriter>,
    run_date: NaiveDate,
}

impl SnapshotEngine<HttpPageFetcher> {
    /// Build an HTTP-backed engine from configuration
    pub fn from_config(config: &SnapshotConfig) -> Result<Self> {
        config.validate()?;
        let controller = PaginationController::new(config.encoder(), config.build_fetcher()?)
            .with_config(config.pagination_config());
        let sink = build_sink(&config.sink)?;
        Ok(Self::new(controller, config.mapper(), sink))
    }
}

impl<F: PageFetcher> SnapshotEngine<F> {
    /// Create a new engine dated today (local time)
    pub fn new(
        controller: PaginationController<F>,
        mapper: SchemaMapper,
        sink: Box<dyn SinkWriter>,
    ) -> Self {
        Self {
            controller,
            mapper,
            sink,
            run_date: Local::now().date_naive(),
        }
    }

    /// Stamp output with a specific date
    #[must_use]
    pub fn with_run_date(mut self, run_date: NaiveDate) -> Self {
        self.run_date = run_date;
        self
    }

    /// Date stamped on the output
    pub fn run_date(&self) -> NaiveDate {
        self.run_date
    }

    /// Run the snapshot
    ///
    /// Discovery and encoding failures produce a [`RunStatus::Failed`] report
    /// without touching the sink. Sink errors, and schema violations under
    /// the abort policy, are returned as `Err`.
    pub async fn run(&self) -> Result<RunReport> {
        let start = Instant::now();
        info!(
            "Starting snapshot of {} for {}",
            self.controller.encoder().index(),
            self.run_date
        );

        let pagination = match self.controller.run().await {
            Ok(result) => result,
            Err(e) if e.is_total_failure() => {
                error!("Snapshot failed: {e}");
                return Ok(self.failed_report(&e, start));
            }
            Err(e) => return Err(e),
        };

        let mut stats = RunStats::new();
        for page in &pagination.pages {
            stats.add_page(&page.outcome);
        }

        let complete = pagination.is_complete();
        let mapped = self.mapper.map(pagination.dataset)?;
        stats.records_dropped = mapped.dropped();

        let receipt = self.sink.write(&mapped.records, self.run_date).await?;
        stats.records_written = receipt.rows;
        stats.set_duration(start.elapsed().as_millis() as u64);

        let status = if complete && mapped.violations.is_empty() {
            RunStatus::Complete
        } else {
            RunStatus::Partial
        };

        if status == RunStatus::Partial {
            warn!(
                "Snapshot partial: {} failed page(s), {} skipped page(s), {} dropped record(s)",
                stats.pages_failed, stats.pages_skipped, stats.records_dropped
            );
        }
        info!(
            "Snapshot {status}: {} record(s) written to {} in {}ms",
            stats.records_written, receipt.location, stats.duration_ms
        );

        Ok(RunReport {
            status,
            run_date: self.run_date,
            total_pages: pagination.total_pages,
            pages: pagination.pages,
            violations: mapped.violations,
            receipt: Some(receipt),
            failure: None,
            stats,
        })
    }

    fn failed_report(&self, err: &Error, start: Instant) -> RunReport {
        let pages = match err {
            Error::Discovery(DiscoveryFailure::Fetch(e)) => vec![PageReport {
                page: 1,
                outcome: PageOutcome::Failed(e.clone()),
            }],
            _ => Vec::new(),
        };

        let mut stats = RunStats::new();
        for page in &pages {
            stats.add_page(&page.outcome);
        }
        stats.set_duration(start.elapsed().as_millis() as u64);

        RunReport {
            status: RunStatus::Failed,
            run_date: self.run_date,
            total_pages: 0,
            pages,
            violations: Vec::new(),
            receipt: None,
            failure: Some(err.to_string()),
            stats,
        }
    }
}
