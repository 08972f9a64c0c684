//! Delimited text encoding

use crate::error::{Error, Result};
use crate::schema::{TargetRecord, TARGET_COLUMNS};

/// Encode records as delimited text with a header row
///
/// `None` fields become empty cells. The header is written even when there
/// are no records.
pub fn records_to_delimited(records: &[TargetRecord], delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(TARGET_COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }

    writer
        .into_inner()
        .map_err(|e| Error::output(format!("Failed to flush delimited output: {}", e.error())))
}
