//! Sink writers
//!
//! A sink persists the mapped snapshot once per run. Both variants build the
//! whole file in memory and write it through a [`CloudDestination`], so the
//! same code serves local paths and object storage.

use super::cloud::CloudDestination;
use super::delimited::records_to_delimited;
use super::schema::{processing_date_value, records_to_batch};
use super::writer::{write_batch_to_parquet_bytes, ParquetWriterConfig};
use crate::config::SinkConfig;
use crate::error::Result;
use crate::schema::TargetRecord;
use crate::types::SinkFormat;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

/// What a sink wrote
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SinkReceipt {
    /// Full path or URL of the written object
    pub location: String,
    /// Data rows written (header excluded)
    pub rows: usize,
    /// Size of the written object
    pub bytes: usize,
}

/// Persists a finished snapshot
#[async_trait]
pub trait SinkWriter: Send + Sync {
    /// Write all records for the run on `run_date`
    async fn write(&self, records: &[TargetRecord], run_date: NaiveDate) -> Result<SinkReceipt>;

    /// The format this sink produces
    fn format(&self) -> SinkFormat;
}

/// Delimited text sink: `<dataset_name>_<YYYY-MM-DD>.csv`
#[derive(Debug, Clone)]
pub struct DelimitedSink {
    destination: CloudDestination,
    dataset_name: String,
    delimiter: u8,
}

impl DelimitedSink {
    /// Create a delimited sink
    pub fn new(destination: CloudDestination, dataset_name: impl Into<String>, delimiter: u8) -> Self {
        Self {
            destination,
            dataset_name: dataset_name.into(),
            delimiter,
        }
    }

    /// Object name for a run date
    pub fn file_name(&self, run_date: NaiveDate) -> String {
        format!("{}_{}.csv", self.dataset_name, run_date.format("%Y-%m-%d"))
    }
}

#[async_trait]
impl SinkWriter for DelimitedSink {
    async fn write(&self, records: &[TargetRecord], run_date: NaiveDate) -> Result<SinkReceipt> {
        let data = records_to_delimited(records, self.delimiter)?;
        let bytes = data.len();
        let location = self
            .destination
            .write(&self.file_name(run_date), Bytes::from(data))
            .await?;

        info!("Wrote {} row(s) to {location}", records.len());
        Ok(SinkReceipt {
            location,
            rows: records.len(),
            bytes,
        })
    }

    fn format(&self) -> SinkFormat {
        SinkFormat::Csv
    }
}

/// Partitioned Parquet sink:
/// `<dataset_name>_<YYYY-MM-DD>/processing_date=<yyyyMMdd>/part-00000.parquet`
#[derive(Debug, Clone)]
pub struct ColumnarSink {
    destination: CloudDestination,
    dataset_name: String,
    config: ParquetWriterConfig,
}

impl ColumnarSink {
    /// Create a Snappy-compressed Parquet sink
    pub fn new(destination: CloudDestination, dataset_name: impl Into<String>) -> Self {
        Self {
            destination,
            dataset_name: dataset_name.into(),
            config: ParquetWriterConfig::default(),
        }
    }

    /// Override Parquet writer settings
    #[must_use]
    pub fn with_writer_config(mut self, config: ParquetWriterConfig) -> Self {
        self.config = config;
        self
    }

    /// Object name for a run date
    pub fn file_name(&self, run_date: NaiveDate) -> String {
        format!(
            "{}_{}/processing_date={}/part-00000.parquet",
            self.dataset_name,
            run_date.format("%Y-%m-%d"),
            processing_date_value(run_date)
        )
    }
}

#[async_trait]
impl SinkWriter for ColumnarSink {
    async fn write(&self, records: &[TargetRecord], run_date: NaiveDate) -> Result<SinkReceipt> {
        let batch = records_to_batch(records, Some(run_date))?;
        let data = write_batch_to_parquet_bytes(&batch, Some(&self.config))?;
        let bytes = data.len();
        let location = self
            .destination
            .write(&self.file_name(run_date), Bytes::from(data))
            .await?;

        info!("Wrote {} row(s) to {location}", batch.num_rows());
        Ok(SinkReceipt {
            location,
            rows: batch.num_rows(),
            bytes,
        })
    }

    fn format(&self) -> SinkFormat {
        SinkFormat::Parquet
    }
}

/// Build the sink described by `config`
pub fn build_sink(config: &SinkConfig) -> Result<Box<dyn SinkWriter>> {
    let destination = CloudDestination::parse(&config.destination)?;
    let sink: Box<dyn SinkWriter> = match config.format {
        SinkFormat::Csv => Box::new(DelimitedSink::new(
            destination,
            &config.dataset_name,
            config.delimiter_byte()?,
        )),
        SinkFormat::Parquet => Box::new(ColumnarSink::new(destination, &config.dataset_name)),
    };
    Ok(sink)
}
