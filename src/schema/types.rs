//! Schema types

use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Column names in output order
pub const TARGET_COLUMNS: [&str; 7] = [
    "segment",
    "code",
    "asset",
    "type",
    "participation",
    "theoretical_quantity",
    "update_date",
];

/// One index constituent in the shape the sinks persist
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRecord {
    pub segment: Option<String>,
    pub code: Option<String>,
    pub asset: Option<String>,
    #[serde(rename = "type")]
    pub asset_type: Option<String>,
    /// Participation as the upstream formats it (pt-BR decimal text)
    pub participation: Option<String>,
    pub theoretical_quantity: Option<i64>,
    pub update_date: Option<String>,
}

/// A record that could not be coerced into [`TargetRecord`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaViolation {
    /// Page the record came from
    pub page: u32,
    /// 0-based position of the record within its page
    pub position: usize,
    /// Target column that failed
    pub field: String,
    /// What was wrong with the value
    pub message: String,
}

impl std::fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "page {} record {} field '{}': {}",
            self.page, self.position, self.field, self.message
        )
    }
}

impl From<SchemaViolation> for Error {
    fn from(v: SchemaViolation) -> Self {
        Error::SchemaViolation {
            page: v.page,
            position: v.position,
            field: v.field,
            message: v.message,
        }
    }
}

/// Result of mapping a dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappedDataset {
    /// Records that mapped cleanly, in dataset order
    pub records: Vec<TargetRecord>,
    /// One entry per dropped record
    pub violations: Vec<SchemaViolation>,
}

impl MappedDataset {
    /// Number of records dropped by the mapper
    pub fn dropped(&self) -> usize {
        self.violations.len()
    }
}
