//! Output module
//!
//! Persists the mapped snapshot.
//!
//! # Overview
//!
//! - [`DelimitedSink`] - header plus one row per record, via `csv`
//! - [`ColumnarSink`] - Snappy Parquet with a `processing_date` partition
//! - [`CloudDestination`] - local paths and S3, R2, GCS, Azure URLs

mod cloud;
mod delimited;
mod schema;
mod sink;
mod writer;

pub use cloud::CloudDestination;
pub use delimited::records_to_delimited;
pub use schema::{processing_date_value, records_to_batch, snapshot_schema, PROCESSING_DATE_COLUMN};
pub use sink::{build_sink, ColumnarSink, DelimitedSink, SinkReceipt, SinkWriter};
pub use writer::{write_batch_to_parquet_bytes, ParquetWriter, ParquetWriterConfig};
