// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # IBOV Portfolio Snapshot
//!
//! Fetches the full constituent list of a B3 index from the paginated
//! portfolio API and writes it as one dated snapshot.
//!
//! ## Features
//!
//! - **Page discovery**: the page count comes from the API's own first page
//! - **Deterministic tokens**: per-page parameters are base64 JSON, pure in the page number
//! - **Ordered accumulation**: records keep API order and page provenance
//! - **Partial runs**: a failed page leaves a gap, not a failed run
//! - **Two sinks**: delimited text, or Parquet partitioned by processing date
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ibov_snapshot::{config::SnapshotConfig, engine::SnapshotEngine, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = SnapshotConfig::load("snapshot.yaml")?;
//!     let report = SnapshotEngine::from_config(&config)?.run().await?;
//!     println!("{}", report.summary());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                         SnapshotEngine                           │
//! │   run() → RunReport { Complete | Partial | Failed }              │
//! └──────────────────────────────────────────────────────────────────┘
//!                                 │
//! ┌────────────┬──────────────┬───┴────────────┬──────────┬──────────┐
//! │   Params   │    Fetch     │   Pagination   │  Schema  │  Output  │
//! ├────────────┼──────────────┼────────────────┼──────────┼──────────┤
//! │ base64     │ HTTP GET     │ Discover total │ Coerce   │ CSV      │
//! │ JSON token │ Throttle     │ Iterate pages  │ pt-BR    │ Parquet  │
//! │            │ Classify     │ Page slots     │ Drop     │ S3/GCS   │
//! └────────────┴──────────────┴────────────────┴──────────┴──────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: document error variant fields and TargetRecord columns

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Common types and type aliases
pub mod types;

/// Request parameter encoding
pub mod params;

/// HTTP client with throttle and retry
pub mod http;

/// Response envelope decoding
pub mod decode;

/// Page fetching
pub mod fetch;

/// Page-ordered record accumulation
pub mod dataset;

/// Discovery and page iteration
pub mod pagination;

/// Target schema mapping
pub mod schema;

/// CSV/Parquet sinks
pub mod output;

/// Snapshot run orchestration
pub mod engine;

/// YAML configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::SnapshotConfig;
pub use engine::{RunReport, RunStatus, SnapshotEngine};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
