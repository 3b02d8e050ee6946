// Series generators - project feed rows into (time, value) points
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use super::reach::{
    number_field, RowRecord, COL_MULTI_RTT, COL_QUIC_V2, COL_REACHABLE, COL_RETRY, COL_TIME,
    COL_TOO_MUCH, COL_TOTAL,
};

/// Naive timestamp layouts accepted in addition to RFC 3339. The last one is
/// what the quicreach probe writes with `--file`.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y.%m.%d-%H:%M:%S"];

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SeriesError {
    #[error("row {row}: missing column {column}")]
    MissingColumn { row: usize, column: String },
    #[error("row {row}: column {column} is not numeric: {value:?}")]
    NonNumericField {
        row: usize,
        column: String,
        value: String,
    },
    #[error("row {row}: invalid timestamp {value:?}")]
    InvalidTimestamp { row: usize, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub time_ms: i64,
    pub value: f64,
}

impl Point {
    pub fn new(time_ms: i64, value: f64) -> Self {
        Self { time_ms, value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SeriesKind {
    Reachable,
    Unreachable,
    GoodReachable,
    TooMuch,
    MultiRtt,
    QuicV2,
    Retry,
}

impl SeriesKind {
    pub fn default_label(self) -> &'static str {
        match self {
            SeriesKind::Reachable => "Reachable",
            SeriesKind::Unreachable => "Unreachable",
            SeriesKind::GoodReachable => "Good",
            SeriesKind::TooMuch => "Too Much",
            SeriesKind::MultiRtt => "Multi-RTT",
            SeriesKind::QuicV2 => "QUIC v2",
            SeriesKind::Retry => "Retry",
        }
    }

    /// Value of this metric for one row
    pub fn value(self, index: usize, row: &RowRecord) -> Result<f64, SeriesError> {
        let field = |column: &str| number_field(index, row, column);
        let value = match self {
            SeriesKind::Reachable => field(COL_REACHABLE)?,
            SeriesKind::Unreachable => field(COL_TOTAL)? - field(COL_REACHABLE)?,
            SeriesKind::GoodReachable => {
                field(COL_REACHABLE)? - field(COL_TOO_MUCH)? - field(COL_MULTI_RTT)?
            }
            SeriesKind::TooMuch => field(COL_TOO_MUCH)?,
            SeriesKind::MultiRtt => field(COL_MULTI_RTT)?,
            SeriesKind::QuicV2 => field(COL_QUIC_V2)?,
            SeriesKind::Retry => field(COL_RETRY)?,
        };
        Ok(value)
    }
}

/// One point per row, in row order
pub fn generate(kind: SeriesKind, rows: &[RowRecord]) -> Result<Vec<Point>, SeriesError> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let time = parse_timestamp(index, row)?;
            Ok(Point::new(time.timestamp_millis(), kind.value(index, row)?))
        })
        .collect()
}

pub fn parse_timestamp(index: usize, row: &RowRecord) -> Result<DateTime<Utc>, SeriesError> {
    let raw = row.get(COL_TIME).ok_or_else(|| SeriesError::MissingColumn {
        row: index,
        column: COL_TIME.to_string(),
    })?;

    parse_time_text(raw.trim()).ok_or_else(|| SeriesError::InvalidTimestamp {
        row: index,
        value: raw.to_string(),
    })
}

fn parse_time_text(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(time) = DateTime::parse_from_rfc3339(text) {
        return Some(time.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(time) = NaiveDateTime::parse_from_str(text, format) {
            return Some(time.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc())
}

/// Human-readable UTC date for an x value
pub fn format_timestamp(time_ms: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(time_ms) {
        Some(time) => time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => time_ms.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reach::parse_rows;

    const FEED: &str = "UtcDateTime,Total,Reachable,TooMuch,MultiRtt,QuicV2\n\
                        2024-01-01T00:00:00Z,100,80,5,7,12\n\
                        2024-01-02T00:00:00Z,110,90,4,9,15\n\
                        2024-01-03T00:00:00Z,120,85,6,11,20\n";

    fn ms(text: &str) -> i64 {
        DateTime::parse_from_rfc3339(text).unwrap().timestamp_millis()
    }

    #[test]
    fn test_reachable_series_example() {
        let rows =
            parse_rows("UtcDateTime,Total,Reachable\n2024-01-01T00:00:00Z,10,8\n2024-01-02T00:00:00Z,10,9\n");
        let points = generate(SeriesKind::Reachable, &rows).unwrap();

        assert_eq!(
            points,
            vec![
                Point::new(ms("2024-01-01T00:00:00Z"), 8.0),
                Point::new(ms("2024-01-02T00:00:00Z"), 9.0),
            ]
        );
    }

    #[test]
    fn test_series_length_and_x_follow_rows() {
        let rows = parse_rows(FEED);
        for kind in [
            SeriesKind::Reachable,
            SeriesKind::Unreachable,
            SeriesKind::GoodReachable,
            SeriesKind::TooMuch,
            SeriesKind::MultiRtt,
            SeriesKind::QuicV2,
        ] {
            let points = generate(kind, &rows).unwrap();
            assert_eq!(points.len(), rows.len());
            for (i, point) in points.iter().enumerate() {
                assert_eq!(point.time_ms, parse_timestamp(i, &rows[i]).unwrap().timestamp_millis());
            }
        }
    }

    #[test]
    fn test_derived_values() {
        let rows = parse_rows(FEED);
        let unreachable = generate(SeriesKind::Unreachable, &rows).unwrap();
        let quic_v2 = generate(SeriesKind::QuicV2, &rows).unwrap();

        assert_eq!(unreachable.iter().map(|p| p.value).collect::<Vec<_>>(), vec![20.0, 20.0, 35.0]);
        assert_eq!(quic_v2.iter().map(|p| p.value).collect::<Vec<_>>(), vec![12.0, 15.0, 20.0]);
    }

    #[test]
    fn test_breakdown_sums_to_reachable() {
        let rows = parse_rows(FEED);
        let good = generate(SeriesKind::GoodReachable, &rows).unwrap();
        let too_much = generate(SeriesKind::TooMuch, &rows).unwrap();
        let multi_rtt = generate(SeriesKind::MultiRtt, &rows).unwrap();
        let reachable = generate(SeriesKind::Reachable, &rows).unwrap();

        for i in 0..rows.len() {
            assert_eq!(good[i].value + too_much[i].value + multi_rtt[i].value, reachable[i].value);
        }
    }

    #[test]
    fn test_non_numeric_field_is_reported() {
        let rows = parse_rows("UtcDateTime,Total,Reachable\n2024-01-01T00:00:00Z,10,8\n2024-01-02T00:00:00Z,10,n/a\n");
        let err = generate(SeriesKind::Reachable, &rows).unwrap_err();

        assert_eq!(
            err,
            SeriesError::NonNumericField {
                row: 1,
                column: "Reachable".to_string(),
                value: "n/a".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_column_is_reported() {
        let rows = parse_rows("UtcDateTime,Total,Reachable\n2024-01-01T00:00:00Z,10,8\n");
        let err = generate(SeriesKind::QuicV2, &rows).unwrap_err();
        assert!(matches!(err, SeriesError::MissingColumn { row: 0, ref column } if column == "QuicV2"));
    }

    #[test]
    fn test_timestamp_formats() {
        let expected = ms("2024-03-05T06:07:08Z");
        for text in [
            "2024-03-05T06:07:08Z",
            "2024-03-05T07:07:08+01:00",
            "2024-03-05T06:07:08",
            "2024-03-05 06:07:08",
            "2024.03.05-06:07:08",
        ] {
            assert_eq!(parse_time_text(text).map(|t| t.timestamp_millis()), Some(expected), "{text}");
        }

        assert_eq!(
            parse_time_text("2024-03-05").map(|t| t.timestamp_millis()),
            Some(ms("2024-03-05T00:00:00Z"))
        );
        assert_eq!(parse_time_text("yesterday"), None);
    }

    #[test]
    fn test_invalid_timestamp_is_reported() {
        let rows = parse_rows("UtcDateTime,Reachable\nsoon,1\n");
        let err = generate(SeriesKind::Reachable, &rows).unwrap_err();
        assert!(matches!(err, SeriesError::InvalidTimestamp { row: 0, .. }));
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(ms("2024-01-02T03:04:05Z")), "2024-01-02 03:04:05 UTC");
    }
}
