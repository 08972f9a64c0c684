//! Envelope decoder implementation

use super::types::PageResponse;
use crate::fetch::FetchError;
use crate::types::{JsonObject, JsonValue, RawRecord};

/// Key holding the record array
const RESULTS_KEY: &str = "results";

/// Key holding paging metadata
const PAGE_KEY: &str = "page";

/// Key inside `page` holding the total page count
const TOTAL_PAGES_KEY: &str = "totalPages";

/// Decode a response body served with `status_code` into a page
///
/// A missing `results` key (or `null`) is an empty page and a missing
/// `page.totalPages` counts as zero pages. Keys that are present but have the
/// wrong shape are parse errors.
pub fn decode_page(status_code: u16, body: &str) -> Result<PageResponse, FetchError> {
    let value: JsonValue = serde_json::from_str(body)
        .map_err(|e| FetchError::parse(format!("body is not valid JSON: {e}")))?;

    let JsonValue::Object(envelope) = value else {
        return Err(FetchError::parse(format!(
            "expected a JSON object, got {}",
            type_name(&value)
        )));
    };

    let total_pages = extract_total_pages(&envelope)?;
    let records = extract_records(envelope)?;

    Ok(PageResponse {
        status_code,
        total_pages,
        records,
    })
}

fn extract_total_pages(envelope: &JsonObject) -> Result<u32, FetchError> {
    let page = match envelope.get(PAGE_KEY) {
        None | Some(JsonValue::Null) => return Ok(0),
        Some(JsonValue::Object(page)) => page,
        Some(other) => {
            return Err(FetchError::parse(format!(
                "'{PAGE_KEY}' should be an object, got {}",
                type_name(other)
            )))
        }
    };

    match page.get(TOTAL_PAGES_KEY) {
        None | Some(JsonValue::Null) => Ok(0),
        Some(JsonValue::Number(n)) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| {
                FetchError::parse(format!(
                    "'{PAGE_KEY}.{TOTAL_PAGES_KEY}' is not a page count: {n}"
                ))
            }),
        Some(other) => Err(FetchError::parse(format!(
            "'{PAGE_KEY}.{TOTAL_PAGES_KEY}' should be an integer, got {}",
            type_name(other)
        ))),
    }
}

fn extract_records(mut envelope: JsonObject) -> Result<Vec<RawRecord>, FetchError> {
    let items = match envelope.remove(RESULTS_KEY) {
        None | Some(JsonValue::Null) => return Ok(Vec::new()),
        Some(JsonValue::Array(items)) => items,
        Some(other) => {
            return Err(FetchError::parse(format!(
                "'{RESULTS_KEY}' should be an array, got {}",
                type_name(&other)
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| match item {
            JsonValue::Object(record) => Ok(record),
            other => Err(FetchError::parse(format!(
                "'{RESULTS_KEY}[{idx}]' should be an object, got {}",
                type_name(&other)
            ))),
        })
        .collect()
}

fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
