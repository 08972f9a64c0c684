//! Arrow schema for the snapshot and TargetRecord to Arrow conversion

use crate::error::Result;
use crate::schema::TargetRecord;
use arrow::array::{ArrayRef, Int32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, NaiveDate};
use std::sync::Arc;

/// Partition column added by the columnar sink
pub const PROCESSING_DATE_COLUMN: &str = "processing_date";

/// Fixed snapshot schema
///
/// Every data column is nullable; `processing_date` is appended as a
/// non-null `Int32` when `with_processing_date` is set.
pub fn snapshot_schema(with_processing_date: bool) -> SchemaRef {
    let mut fields = vec![
        Field::new("segment", DataType::Utf8, true),
        Field::new("code", DataType::Utf8, true),
        Field::new("asset", DataType::Utf8, true),
        Field::new("type", DataType::Utf8, true),
        Field::new("participation", DataType::Utf8, true),
        Field::new("theoretical_quantity", DataType::Int64, true),
        Field::new("update_date", DataType::Utf8, true),
    ];
    if with_processing_date {
        fields.push(Field::new(PROCESSING_DATE_COLUMN, DataType::Int32, false));
    }
    Arc::new(Schema::new(fields))
}

/// `yyyyMMdd` as an integer, e.g. 2024-10-17 → 20241017
pub fn processing_date_value(date: NaiveDate) -> i32 {
    date.year() * 10_000 + date.month() as i32 * 100 + date.day() as i32
}

/// Convert records into one RecordBatch of [`snapshot_schema`]
pub fn records_to_batch(
    records: &[TargetRecord],
    processing_date: Option<NaiveDate>,
) -> Result<RecordBatch> {
    fn text(records: &[TargetRecord], get: impl Fn(&TargetRecord) -> Option<&str>) -> ArrayRef {
        Arc::new(records.iter().map(get).collect::<StringArray>())
    }

    let mut columns: Vec<ArrayRef> = vec![
        text(records, |r| r.segment.as_deref()),
        text(records, |r| r.code.as_deref()),
        text(records, |r| r.asset.as_deref()),
        text(records, |r| r.asset_type.as_deref()),
        text(records, |r| r.participation.as_deref()),
        Arc::new(
            records
                .iter()
                .map(|r| r.theoretical_quantity)
                .collect::<Int64Array>(),
        ),
        text(records, |r| r.update_date.as_deref()),
    ];

    if let Some(date) = processing_date {
        let value = processing_date_value(date);
        columns.push(Arc::new(Int32Array::from(vec![value; records.len()])));
    }

    let batch = RecordBatch::try_new(snapshot_schema(processing_date.is_some()), columns)?;
    Ok(batch)
}
