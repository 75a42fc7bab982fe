mod extract;
mod types;

pub use extract::{AlarmEvent, AlarmSeries, AttributeTriplet, SeriesSelector, extract};
pub use types::{AlarmCategory, AlarmField, AlarmRecord};

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Resolve a user-supplied category name: a prefix (`network_delay`) or a
/// counts key (`network_delay_alarm_counts`).
pub fn parse_category(name: &str) -> Result<AlarmCategory> {
    AlarmCategory::from_prefix(name)
        .or_else(|| AlarmCategory::from_counts_key(name))
        .ok_or_else(|| Error::selection(name))
}

/// Triplets for a strict selection: every name must be a known category.
pub fn parse_selection<S: AsRef<str>>(names: &[S]) -> Result<Vec<AttributeTriplet>> {
    names
        .iter()
        .map(|name| parse_category(name.as_ref()).map(AttributeTriplet::for_category))
        .collect()
}

/// Counts key for a known category name; anything else is kept verbatim.
pub fn counts_key_or_verbatim(name: &str) -> String {
    match parse_category(name) {
        Ok(category) => category.counts_key().to_string(),
        Err(_) => {
            tracing::warn!(category = name, "unknown alarm category, passing through");
            name.to_string()
        }
    }
}

/// Either a bare record array or a paginated API envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordDocument {
    Bare(Vec<AlarmRecord>),
    Paged { results: Vec<AlarmRecord> },
}

/// Parse a JSON document of alarm records.
pub fn parse_records(json: &str) -> Result<Vec<AlarmRecord>> {
    let doc: RecordDocument = serde_json::from_str(json)
        .map_err(|e| Error::parse(format!("Failed to parse alarm records: {e}")))?;
    Ok(match doc {
        RecordDocument::Bare(records) => records,
        RecordDocument::Paged { results } => results,
    })
}

/// Load alarm records previously fetched to disk.
pub fn load_records(path: &Path) -> Result<Vec<AlarmRecord>> {
    let content = std::fs::read_to_string(path)?;
    let records = parse_records(&content)?;
    tracing::debug!(path = %path.display(), records = records.len(), "loaded alarm records");
    Ok(records)
}
