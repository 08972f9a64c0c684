//! Page-slotted record accumulator

use super::types::{Dataset, DatasetStats, PageRecord};
use crate::error::{Error, Result};
use crate::types::RawRecord;
use tracing::debug;

#[derive(Debug, Clone)]
enum Slot {
    Pending,
    Filled(Vec<RawRecord>),
    Failed,
    Skipped,
}

/// Collects per-page batches into one ordered dataset
///
/// Each page may be settled exactly once, either with a batch, as failed or
/// as skipped. Settling a page twice, or a page outside `1..=total_pages`,
/// is an error.
#[derive(Debug)]
pub struct RecordAccumulator {
    slots: Vec<Slot>,
}

impl RecordAccumulator {
    /// Create an accumulator with one slot per page
    pub fn new(total_pages: u32) -> Self {
        Self {
            slots: vec![Slot::Pending; total_pages as usize],
        }
    }

    /// Page count this accumulator was sized for
    pub fn total_pages(&self) -> u32 {
        self.slots.len() as u32
    }

    /// Store the records fetched for `page`
    pub fn append(&mut self, page: u32, batch: Vec<RawRecord>) -> Result<()> {
        if batch.is_empty() {
            debug!("Page {page} contributed no records");
        }
        self.settle(page, Slot::Filled(batch))
    }

    /// Mark `page` as failed
    pub fn record_failure(&mut self, page: u32) -> Result<()> {
        self.settle(page, Slot::Failed)
    }

    /// Mark `page` as never attempted
    pub fn record_skipped(&mut self, page: u32) -> Result<()> {
        self.settle(page, Slot::Skipped)
    }

    /// Number of records held so far
    pub fn record_count(&self) -> usize {
        self.slots
            .iter()
            .map(|slot| match slot {
                Slot::Filled(batch) => batch.len(),
                _ => 0,
            })
            .sum()
    }

    fn settle(&mut self, page: u32, value: Slot) -> Result<()> {
        let total = self.total_pages();
        let slot = page
            .checked_sub(1)
            .and_then(|idx| self.slots.get_mut(idx as usize))
            .ok_or_else(|| {
                Error::accumulator(format!("page {page} is outside 1..={total}"))
            })?;

        if !matches!(slot, Slot::Pending) {
            return Err(Error::accumulator(format!("page {page} was already settled")));
        }
        *slot = value;
        Ok(())
    }

    /// Flatten the slots into a page-ordered dataset
    ///
    /// Pages never settled are counted as skipped.
    pub fn finalize(self) -> Dataset {
        let mut stats = DatasetStats {
            total_pages: self.total_pages(),
            ..DatasetStats::default()
        };
        let mut records = Vec::with_capacity(self.record_count());

        for (idx, slot) in self.slots.into_iter().enumerate() {
            let page = idx as u32 + 1;
            match slot {
                Slot::Filled(batch) => {
                    stats.pages_fetched += 1;
                    if batch.is_empty() {
                        stats.empty_pages.push(page);
                    }
                    records.extend(batch.into_iter().map(|record| PageRecord { page, record }));
                }
                Slot::Failed => stats.failed_pages.push(page),
                Slot::Skipped | Slot::Pending => stats.skipped_pages.push(page),
            }
        }

        stats.records = records.len();
        Dataset { records, stats }
    }
}
