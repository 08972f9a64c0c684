//! Tests for pagination module

use super::*;
use crate::decode::PageResponse;
use crate::error::{DiscoveryFailure, Error};
use crate::fetch::{FetchError, PageFetcher};
use crate::params::{EncodedToken, ParameterEncoder};
use crate::types::RawRecord;
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

// ============================================================================
// Scripted fetcher
// ============================================================================

/// Answers each page from a script and records which pages were requested
#[derive(Default)]
struct ScriptedFetcher {
    pages: HashMap<u32, std::result::Result<PageResponse, FetchError>>,
    requested: Mutex<Vec<u32>>,
}

impl ScriptedFetcher {
    fn page(mut self, page: u32, total: u32, codes: &[&str]) -> Self {
        let records = codes.iter().map(|c| record(page, c)).collect();
        self.pages.insert(
            page,
            Ok(PageResponse {
                status_code: 200,
                total_pages: total,
                records,
            }),
        );
        self
    }

    fn failing(mut self, page: u32, error: FetchError) -> Self {
        self.pages.insert(page, Err(error));
        self
    }

    fn requested(&self) -> Vec<u32> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, token: &EncodedToken) -> std::result::Result<PageResponse, FetchError> {
        let page = ParameterEncoder::decode(token).unwrap().page_number;
        self.requested.lock().unwrap().push(page);
        self.pages
            .get(&page)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::Http { status: 404 }))
    }
}

fn record(page: u32, code: &str) -> RawRecord {
    json!({ "cod": code, "page": page }).as_object().cloned().unwrap()
}

fn controller(fetcher: ScriptedFetcher) -> PaginationController<ScriptedFetcher> {
    PaginationController::new(ParameterEncoder::default(), fetcher)
}

fn codes(result: &PaginationResult) -> Vec<String> {
    result
        .dataset
        .records
        .iter()
        .map(|r| r.record["cod"].as_str().unwrap().to_string())
        .collect()
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_pagination_config_default() {
    let config = PaginationConfig::default();
    assert_eq!(config.max_concurrency, 1);
    assert!(config.deadline.is_none());
    assert_eq!(config.max_pages, DEFAULT_MAX_PAGES);
}

#[test]
fn test_pagination_config_builder() {
    let config = PaginationConfig::new()
        .with_max_concurrency(0)
        .with_deadline(Duration::from_secs(90))
        .with_max_pages(0);
    assert_eq!(config.max_concurrency, 1);
    assert_eq!(config.max_pages, 1);
    assert_eq!(config.deadline, Some(Duration::from_secs(90)));
}

#[test]
fn test_page_outcome_helpers() {
    assert_eq!(PageOutcome::Records(4).record_count(), 4);
    assert_eq!(PageOutcome::Empty.record_count(), 0);
    assert!(PageOutcome::Empty.is_fetched());
    assert!(!PageOutcome::Skipped.is_fetched());
    assert_eq!(
        PageOutcome::Failed(FetchError::Http { status: 500 }).label(),
        "failed"
    );
    assert_eq!(RunPhase::DiscoveringTotal.to_string(), "discovering_total");
}

// ============================================================================
// Run Tests
// ============================================================================

#[tokio::test]
async fn test_single_page_run() {
    let fetcher = ScriptedFetcher::default().page(1, 1, &["PETR4", "VALE3"]);
    let ctl = controller(fetcher);

    let result = ctl.run().await.unwrap();
    assert_eq!(result.total_pages, 1);
    assert_eq!(result.phase, RunPhase::Done);
    assert_eq!(codes(&result), vec!["PETR4", "VALE3"]);
    assert_eq!(ctl.fetcher().requested(), vec![1]);
    assert!(result.is_complete());
}

#[tokio::test]
async fn test_pages_requested_once_in_ascending_order() {
    let fetcher = ScriptedFetcher::default()
        .page(1, 4, &["A"])
        .page(2, 4, &["B"])
        .page(3, 4, &["C"])
        .page(4, 4, &["D"]);
    let ctl = controller(fetcher);

    let result = ctl.run().await.unwrap();
    assert_eq!(ctl.fetcher().requested(), vec![1, 2, 3, 4]);
    assert_eq!(codes(&result), vec!["A", "B", "C", "D"]);
    assert_eq!(
        result.pages.iter().map(|p| p.page).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );
}

#[tokio::test]
async fn test_middle_page_failure_leaves_gap() {
    let five = ["1", "2", "3", "4", "5"];
    let fetcher = ScriptedFetcher::default()
        .page(1, 3, &five)
        .failing(2, FetchError::Http { status: 500 })
        .page(3, 3, &five);
    let ctl = controller(fetcher);

    let result = ctl.run().await.unwrap();
    assert_eq!(result.dataset.len(), 10);
    assert_eq!(result.dataset.pages(), vec![1, 3]);
    assert_eq!(result.failed_pages(), vec![2]);
    assert_eq!(
        result.pages[1].outcome,
        PageOutcome::Failed(FetchError::Http { status: 500 })
    );
    assert!(!result.is_complete());
    // A failed page is not retried by the controller
    assert_eq!(ctl.fetcher().requested(), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_empty_page_is_reported() {
    let fetcher = ScriptedFetcher::default()
        .page(1, 2, &["A"])
        .page(2, 2, &[]);

    let result = controller(fetcher).run().await.unwrap();
    assert_eq!(result.pages[1].outcome, PageOutcome::Empty);
    assert_eq!(result.dataset.stats.empty_pages, vec![2]);
    assert!(result.is_complete());
}

#[tokio::test]
async fn test_discovery_fetch_failure_aborts() {
    let fetcher = ScriptedFetcher::default().failing(1, FetchError::Http { status: 503 });
    let ctl = controller(fetcher);

    let err = ctl.run().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Discovery(DiscoveryFailure::Fetch(FetchError::Http { status: 503 }))
    ));
    assert_eq!(ctl.fetcher().requested(), vec![1]);
}

#[tokio::test]
async fn test_zero_total_pages_aborts() {
    let fetcher = ScriptedFetcher::default().page(1, 0, &["A"]);
    let ctl = controller(fetcher);

    let err = ctl.run().await.unwrap_err();
    assert!(matches!(err, Error::Discovery(DiscoveryFailure::NoPages)));
    assert_eq!(ctl.fetcher().requested(), vec![1]);
}

#[tokio::test]
async fn test_page_count_above_limit_aborts_before_iterating() {
    let fetcher = ScriptedFetcher::default()
        .page(1, u32::MAX, &["A"])
        .failing(2, FetchError::Http { status: 500 });
    let ctl = controller(fetcher).with_config(PaginationConfig::new().with_deadline(Duration::ZERO));

    let err = ctl.run().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Discovery(DiscoveryFailure::TooManyPages {
            reported: u32::MAX,
            limit: DEFAULT_MAX_PAGES
        })
    ));
    assert!(err.is_total_failure());
    assert_eq!(ctl.fetcher().requested(), vec![1]);
}

#[tokio::test]
async fn test_page_count_at_limit_runs() {
    let fetcher = ScriptedFetcher::default()
        .page(1, 3, &["A"])
        .page(2, 3, &["B"])
        .page(3, 3, &["C"]);
    let ctl = controller(fetcher).with_config(PaginationConfig::new().with_max_pages(3));

    let result = ctl.run().await.unwrap();
    assert_eq!(codes(&result), vec!["A", "B", "C"]);
    assert!(result.is_complete());
}

#[tokio::test]
async fn test_zero_page_size_is_encoding_failure() {
    let fetcher = ScriptedFetcher::default().page(1, 1, &["A"]);
    let ctl = PaginationController::new(ParameterEncoder::new("IBOV", 0, "pt-br"), fetcher);

    let err = ctl.run().await.unwrap_err();
    assert!(matches!(err, Error::Encoding { page: 1, .. }));
    assert!(ctl.fetcher().requested().is_empty());
}

#[tokio::test]
async fn test_concurrent_run_keeps_page_order() {
    let mut fetcher = ScriptedFetcher::default();
    for page in 1..=8 {
        let code = format!("P{page}");
        fetcher = fetcher.page(page, 8, &[code.as_str()]);
    }
    let ctl = controller(fetcher).with_config(PaginationConfig::new().with_max_concurrency(4));

    let result = ctl.run().await.unwrap();
    assert_eq!(
        codes(&result),
        (1..=8).map(|p| format!("P{p}")).collect::<Vec<_>>()
    );

    // Pages start in ascending order even with several in flight
    assert_eq!(ctl.fetcher().requested(), (1..=8).collect::<Vec<_>>());
    assert_eq!(
        result.pages.iter().map(|p| p.page).collect::<Vec<_>>(),
        (1..=8).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_expired_deadline_skips_remaining_pages() {
    let fetcher = ScriptedFetcher::default()
        .page(1, 3, &["A"])
        .page(2, 3, &["B"])
        .page(3, 3, &["C"]);
    let ctl = controller(fetcher).with_config(PaginationConfig::new().with_deadline(Duration::ZERO));

    let result = ctl.run().await.unwrap();
    // Discovery always runs; everything after it is past the deadline
    assert_eq!(ctl.fetcher().requested(), vec![1]);
    assert_eq!(codes(&result), vec!["A"]);
    assert_eq!(result.pages[1].outcome, PageOutcome::Skipped);
    assert_eq!(result.pages[2].outcome, PageOutcome::Skipped);
    assert_eq!(result.dataset.stats.skipped_pages, vec![2, 3]);
    assert!(!result.is_complete());
}
