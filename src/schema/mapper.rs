//! Raw record to target record coercion

use super::types::{MappedDataset, SchemaViolation, TargetRecord};
use crate::dataset::{Dataset, PageRecord};
use crate::error::Result;
use crate::types::{JsonValue, RawRecord, ViolationPolicy};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Whole number, optionally grouped with pt-BR thousand separators: 445.289.500
pub(super) static QUANTITY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d{1,3}(?:\.\d{3})+|\d+)$").expect("quantity pattern is valid")
});

/// Maps a dataset onto [`TargetRecord`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaMapper {
    policy: ViolationPolicy,
}

impl SchemaMapper {
    /// Create a mapper with the given violation policy
    pub fn new(policy: ViolationPolicy) -> Self {
        Self { policy }
    }

    /// What happens to records that do not fit
    pub fn policy(&self) -> ViolationPolicy {
        self.policy
    }

    /// Map every record of `dataset`
    ///
    /// Under [`ViolationPolicy::Drop`] bad records are skipped and reported in
    /// [`MappedDataset::violations`]. Under [`ViolationPolicy::Abort`] the
    /// first bad record becomes an [`Error::SchemaViolation`].
    ///
    /// [`Error::SchemaViolation`]: crate::error::Error::SchemaViolation
    pub fn map(&self, dataset: Dataset) -> Result<MappedDataset> {
        let mut mapped = MappedDataset {
            records: Vec::with_capacity(dataset.len()),
            violations: Vec::new(),
        };

        let mut current_page = 0;
        let mut position = 0;
        for PageRecord { page, record } in dataset.records {
            if page != current_page {
                current_page = page;
                position = 0;
            }

            match map_record(&record) {
                Ok(target) => mapped.records.push(target),
                Err((field, message)) => {
                    let violation = SchemaViolation {
                        page,
                        position,
                        field: field.to_string(),
                        message,
                    };
                    if self.policy == ViolationPolicy::Abort {
                        return Err(violation.into());
                    }
                    warn!("Dropping record: {violation}");
                    mapped.violations.push(violation);
                }
            }
            position += 1;
        }

        debug!(
            "Mapped {} record(s), dropped {}",
            mapped.records.len(),
            mapped.dropped()
        );
        Ok(mapped)
    }
}

type FieldResult<T> = std::result::Result<T, (&'static str, String)>;

fn map_record(record: &RawRecord) -> FieldResult<TargetRecord> {
    Ok(TargetRecord {
        segment: text(record, "segment", &["segment"])?,
        code: text(record, "code", &["cod", "code"])?,
        asset: text(record, "asset", &["asset"])?,
        asset_type: text(record, "type", &["type"])?,
        participation: text(record, "participation", &["part", "participation"])?,
        theoretical_quantity: quantity(record, &["theoricalQty", "theoreticalQty"])?,
        update_date: text(record, "update_date", &["date", "updateDate"])?,
    })
}

/// First non-null value among `keys`
fn lookup<'a>(record: &'a RawRecord, keys: &[&str]) -> Option<&'a JsonValue> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|value| !value.is_null())
}

fn text(record: &RawRecord, field: &'static str, keys: &[&str]) -> FieldResult<Option<String>> {
    match lookup(record, keys) {
        None => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(JsonValue::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err((field, format!("expected text, got {}", kind(other)))),
    }
}

fn quantity(record: &RawRecord, keys: &[&str]) -> FieldResult<Option<i64>> {
    const FIELD: &str = "theoretical_quantity";
    match lookup(record, keys) {
        None => Ok(None),
        Some(JsonValue::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| (FIELD, format!("{n} is not a whole number in range"))),
        Some(JsonValue::String(s)) => parse_quantity(s)
            .map(Some)
            .ok_or_else(|| (FIELD, format!("'{s}' is not a whole number"))),
        Some(other) => Err((FIELD, format!("expected a number, got {}", kind(other)))),
    }
}

/// Parse a whole quantity, accepting pt-BR thousand separators
///
/// `"445.289.500"` and `"445289500"` both give `445289500`. Decimal commas,
/// misplaced separators and empty strings give `None`.
pub fn parse_quantity(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if !QUANTITY_REGEX.is_match(trimmed) {
        return None;
    }
    trimmed.replace('.', "").parse().ok()
}

fn kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
