//! Pagination controller

use super::types::{PageOutcome, PageReport, PaginationConfig, PaginationResult, RunPhase};
use crate::dataset::RecordAccumulator;
use crate::decode::PageResponse;
use crate::error::{DiscoveryFailure, Error, Result};
use crate::fetch::{FetchError, PageFetcher};
use crate::params::ParameterEncoder;
use futures::stream::{self, StreamExt};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// A page attempt; `None` means the deadline passed before it started
type Attempt = Option<std::result::Result<PageResponse, FetchError>>;

/// Orchestrates discovery and iteration over every page of the listing
pub struct PaginationController<F: PageFetcher> {
    encoder: ParameterEncoder,
    fetcher: F,
    config: PaginationConfig,
}

impl<F: PageFetcher> PaginationController<F> {
    /// Create a sequential controller
    pub fn new(encoder: ParameterEncoder, fetcher: F) -> Self {
        Self {
            encoder,
            fetcher,
            config: PaginationConfig::default(),
        }
    }

    /// Set controller configuration
    #[must_use]
    pub fn with_config(mut self, config: PaginationConfig) -> Self {
        self.config = config;
        self
    }

    /// The encoder used for every page
    pub fn encoder(&self) -> &ParameterEncoder {
        &self.encoder
    }

    /// The fetcher used for every page
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Controller configuration
    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Run discovery and iteration to completion
    ///
    /// Returns `Err` only when discovery or encoding fails. A page that fails
    /// after discovery is reported in [`PaginationResult::pages`] and leaves
    /// a gap in the dataset.
    pub async fn run(&self) -> Result<PaginationResult> {
        let started = Instant::now();
        let deadline = self.config.deadline.map(|d| started + d);

        let mut phase = RunPhase::Init;
        debug!("Pagination phase: {phase}");

        phase = RunPhase::DiscoveringTotal;
        debug!("Pagination phase: {phase}");
        let token = self.encoder.encode(1)?;
        info!("Fetching page 1 to discover the page count");

        let first = match self.fetcher.fetch(&token).await {
            Ok(page) => page,
            Err(e) => {
                error!("Page 1 fetch failed, aborting run: {e}");
                debug!("Pagination phase: {}", RunPhase::Aborted);
                return Err(Error::Discovery(DiscoveryFailure::Fetch(e)));
            }
        };
        if first.total_pages == 0 {
            error!("Page 1 reported zero total pages, aborting run");
            debug!("Pagination phase: {}", RunPhase::Aborted);
            return Err(Error::Discovery(DiscoveryFailure::NoPages));
        }
        if first.total_pages > self.config.max_pages {
            let (reported, limit) = (first.total_pages, self.config.max_pages);
            error!("Page 1 reported {reported} total pages, above the limit of {limit}, aborting");
            debug!("Pagination phase: {}", RunPhase::Aborted);
            return Err(Error::Discovery(DiscoveryFailure::TooManyPages { reported, limit }));
        }

        let total = first.total_pages;
        info!("Discovered {total} page(s)");

        let mut accumulator = RecordAccumulator::new(total);
        let mut pages = Vec::with_capacity(total as usize);
        pages.push(settle(&mut accumulator, 1, total, Some(Ok(first)))?);

        phase = RunPhase::Iterating;
        debug!("Pagination phase: {phase}");

        // Results come back in page order, so each page settles as soon as it lands
        let mut attempts = stream::iter(2..=total)
            .map(|page| self.attempt(page, total, deadline))
            .buffered(self.config.max_concurrency.max(1));

        while let Some(attempt) = attempts.next().await {
            let (page, attempt) = attempt?;
            pages.push(settle(&mut accumulator, page, total, attempt)?);
        }

        phase = RunPhase::Done;
        debug!("Pagination phase: {phase}");

        let dataset = accumulator.finalize();
        info!(
            "Fetched {} record(s) from {}/{} page(s)",
            dataset.stats.records, dataset.stats.pages_fetched, total
        );

        Ok(PaginationResult {
            dataset,
            pages,
            total_pages: total,
            phase,
            duration: started.elapsed(),
        })
    }

    /// Encode and fetch one page unless the deadline has already passed
    async fn attempt(
        &self,
        page: u32,
        total: u32,
        deadline: Option<Instant>,
    ) -> Result<(u32, Attempt)> {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            return Ok((page, None));
        }
        let token = self.encoder.encode(page)?;
        info!("Fetching page {page}/{total}");
        Ok((page, Some(self.fetcher.fetch(&token).await)))
    }
}

impl<F: PageFetcher + std::fmt::Debug> std::fmt::Debug for PaginationController<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationController")
            .field("encoder", &self.encoder)
            .field("fetcher", &self.fetcher)
            .field("config", &self.config)
            .finish()
    }
}

/// Hand one attempt to the accumulator and log its outcome
fn settle(
    accumulator: &mut RecordAccumulator,
    page: u32,
    total: u32,
    attempt: Attempt,
) -> Result<PageReport> {
    let outcome = match attempt {
        Some(Ok(response)) => {
            if response.total_pages != total {
                warn!(
                    "Page {page} reports {} total page(s), keeping {total} from discovery",
                    response.total_pages
                );
            }
            let count = response.len();
            accumulator.append(page, response.records)?;
            if count == 0 {
                warn!("Page {page}/{total} returned no records");
                PageOutcome::Empty
            } else {
                info!("Page {page}/{total}: {count} record(s)");
                PageOutcome::Records(count)
            }
        }
        Some(Err(e)) => {
            accumulator.record_failure(page)?;
            warn!("Page {page}/{total} contributed no records ({})", e.kind());
            error!("Page {page}/{total} fetch failed: {e}");
            PageOutcome::Failed(e)
        }
        None => {
            accumulator.record_skipped(page)?;
            warn!("Page {page}/{total} skipped, run deadline passed");
            PageOutcome::Skipped
        }
    };

    Ok(PageReport { page, outcome })
}
