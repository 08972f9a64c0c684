//! Log events emitted during a snapshot run
//!
//! Kept in its own test binary so the scoped subscriber sees every callsite.

use chrono::NaiveDate;
use ibov_snapshot::config::SnapshotConfig;
use ibov_snapshot::engine::{RunStatus, SnapshotEngine};
use ibov_snapshot::params::ParameterEncoder;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENDPOINT: &str = "/indexProxy/indexCall/GetPortfolioDay";

// ============================================================================
// Capturing layer
// ============================================================================

/// Records level and message of every event from this crate
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<(Level, String)>>>);

impl CapturedLogs {
    fn events(&self) -> Vec<(Level, String)> {
        self.0.lock().unwrap().clone()
    }

    fn at(&self, level: Level) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message)
            .collect()
    }

    fn position(&self, needle: &str) -> usize {
        self.events()
            .iter()
            .position(|(_, message)| message.contains(needle))
            .unwrap_or_else(|| panic!("no event containing {needle:?}"))
    }
}

impl<S: Subscriber> Layer<S> for CapturedLogs {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !event.metadata().target().starts_with("ibov_snapshot") {
            return;
        }
        let mut message = MessageVisitor(String::new());
        event.record(&mut message);
        self.0
            .lock()
            .unwrap()
            .push((*event.metadata().level(), message.0));
    }
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn page_path(page: u32) -> String {
    let token = ParameterEncoder::default().encode(page).unwrap();
    let mut url = Url::parse(&format!("http://localhost{ENDPOINT}")).unwrap();
    url.path_segments_mut().unwrap().push(token.as_str());
    url.path().to_string()
}

fn envelope(total_pages: u32, codes: &[&str]) -> Value {
    let results: Vec<Value> = codes
        .iter()
        .map(|code| json!({"cod": code, "part": "1,0", "theoricalQty": "1.000"}))
        .collect();
    json!({"page": {"totalPages": total_pages}, "results": results})
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_failed_page_is_logged_once_as_error() {
    let logs = CapturedLogs::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(logs.clone()));

    let server = MockServer::start().await;
    let out = tempfile::tempdir().unwrap();
    for (page, body) in [(1, envelope(3, &["A1", "A2"])), (3, envelope(3, &["C1"]))] {
        Mock::given(method("GET"))
            .and(path(page_path(page)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path(page_path(2)))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = SnapshotConfig::default();
    config.source.base_url = format!("{}{ENDPOINT}", server.uri());
    config.http.throttle_ms = 0;
    config.sink.destination = out.path().to_str().unwrap().to_string();

    let report = SnapshotEngine::from_config(&config)
        .unwrap()
        .with_run_date(NaiveDate::from_ymd_opt(2024, 10, 17).unwrap())
        .run()
        .await
        .unwrap();
    assert_eq!(report.status, RunStatus::Partial);

    assert_eq!(
        logs.at(Level::ERROR),
        vec!["Page 2/3 fetch failed: HTTP status 500".to_string()]
    );
    assert!(logs
        .at(Level::WARN)
        .iter()
        .any(|m| m.starts_with("Page 2/3 contributed no records")));

    let info = logs.at(Level::INFO);
    for expected in [
        "Fetching page 2/3",
        "Fetching page 3/3",
        "Page 1/3: 2 record(s)",
        "Page 3/3: 1 record(s)",
    ] {
        assert!(info.iter().any(|m| m == expected), "missing info {expected:?}");
    }

    // Each page is settled before the next one is requested
    assert!(logs.position("Page 2/3 fetch failed") < logs.position("Fetching page 3/3"));
}
