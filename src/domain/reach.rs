// Reachability feed rows and the summary of the latest probe run
use serde::Serialize;
use std::collections::HashMap;

use super::series::{parse_timestamp, SeriesError};

pub const COL_TIME: &str = "UtcDateTime";
pub const COL_TOTAL: &str = "Total";
pub const COL_REACHABLE: &str = "Reachable";
pub const COL_TOO_MUCH: &str = "TooMuch";
pub const COL_MULTI_RTT: &str = "MultiRtt";
pub const COL_QUIC_V2: &str = "QuicV2";
pub const COL_RETRY: &str = "Retry";

/// One CSV data line keyed by header column name. Values are kept as raw text.
#[derive(Debug, Clone, PartialEq)]
pub struct RowRecord {
    fields: HashMap<String, String>,
}

impl RowRecord {
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    pub fn has(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }
}

/// Split feed text into records.
///
/// The first line is the header. Later lines are kept only when their field
/// count matches the header; everything else (including blank trailing lines)
/// is dropped without error. No quoting is understood.
pub fn parse_rows(text: &str) -> Vec<RowRecord> {
    let mut lines = text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l));

    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let headers: Vec<&str> = header_line.split(',').collect();

    let mut rows = Vec::new();
    let mut dropped = 0usize;
    for line in lines {
        let values: Vec<&str> = line.split(',').collect();
        if values.len() != headers.len() {
            dropped += 1;
            continue;
        }

        let fields = headers
            .iter()
            .zip(values)
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        rows.push(RowRecord::new(fields));
    }

    tracing::debug!(
        "Parsed {} rows ({} malformed lines dropped, {} columns)",
        rows.len(),
        dropped,
        headers.len()
    );

    rows
}

/// Totals of the most recent probe run in the feed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReachSummary {
    pub time_ms: i64,
    pub time_label: String,
    pub total: f64,
    pub reachable: f64,
    pub too_much: Option<f64>,
    pub multi_rtt: Option<f64>,
    pub retry: Option<f64>,
    pub reachable_percent: f64,
}

impl ReachSummary {
    /// Build from the last row. Returns `Ok(None)` for an empty feed.
    pub fn from_latest(rows: &[RowRecord]) -> Result<Option<Self>, SeriesError> {
        let Some(index) = rows.len().checked_sub(1) else {
            return Ok(None);
        };
        let row = &rows[index];

        let time = parse_timestamp(index, row)?;
        let total = number_field(index, row, COL_TOTAL)?;
        let reachable = number_field(index, row, COL_REACHABLE)?;

        let optional = |column: &str| -> Result<Option<f64>, SeriesError> {
            if row.has(column) {
                number_field(index, row, column).map(Some)
            } else {
                Ok(None)
            }
        };

        let reachable_percent = if total > 0.0 {
            reachable / total * 100.0
        } else {
            0.0
        };

        Ok(Some(Self {
            time_ms: time.timestamp_millis(),
            time_label: super::series::format_timestamp(time.timestamp_millis()),
            total,
            reachable,
            too_much: optional(COL_TOO_MUCH)?,
            multi_rtt: optional(COL_MULTI_RTT)?,
            retry: optional(COL_RETRY)?,
            reachable_percent,
        }))
    }
}

/// Parse a numeric column of `row`. `index` is only used for error reporting.
pub fn number_field(index: usize, row: &RowRecord, column: &str) -> Result<f64, SeriesError> {
    let raw = row.get(column).ok_or_else(|| SeriesError::MissingColumn {
        row: index,
        column: column.to_string(),
    })?;

    // `parse` accepts "NaN" and "inf", which are not counts
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| SeriesError::NonNumericField {
            row: index,
            column: column.to_string(),
            value: raw.to_string(),
        })
}
