//! Pagination module
//!
//! Drives a full snapshot run: discover the page count from page 1, then walk
//! pages `2..=total_pages`, handing every batch to a
//! [`RecordAccumulator`](crate::dataset::RecordAccumulator).
//!
//! # Overview
//!
//! ```text
//! Init ──► DiscoveringTotal ──► Iterating ──► Done
//!                 │
//!                 └──► Aborted (page 1 failed or reported zero pages)
//! ```
//!
//! A failed page after discovery is recorded and the run goes on. Only
//! discovery and parameter encoding can abort a run.

mod controller;
mod types;

pub use controller::PaginationController;
pub use types::{
    PageOutcome, PageReport, PaginationConfig, PaginationResult, RunPhase, DEFAULT_MAX_PAGES,
};

#[cfg(test)]
mod tests;
