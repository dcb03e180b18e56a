use crate::domain::TimeFields;
use crate::error::{Result, StatsError};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};

/// Formats tried, in order, for timestamps without an explicit offset.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    // WhatsApp export header, e.g. "16/12/25, 10:30"; two-digit years first
    "%d/%m/%y, %H:%M",
    "%d/%m/%Y, %H:%M",
];

/// Parses a timestamp string into a naive (wall clock) datetime
/// Supports various formats: ISO 8601, SQLite datetime, WhatsApp export, etc.
pub fn parse_timestamp(timestamp_str: &str) -> Option<NaiveDateTime> {
    let timestamp_str = timestamp_str.trim();
    if timestamp_str.is_empty() {
        return None;
    }

    // ISO 8601 with offset keeps the sender's wall clock
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp_str) {
        return Some(dt.naive_local());
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive_dt) = NaiveDateTime::parse_from_str(timestamp_str, format) {
            return Some(naive_dt);
        }
    }

    // Date only - treat as midnight
    NaiveDate::parse_from_str(timestamp_str, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Hour bucket label for the activity heatmap.
pub fn period_label(hour: u32) -> String {
    match hour {
        23 => "23-00".to_string(),
        0 => "00-1".to_string(),
        h => format!("{}-{}", h, h + 1),
    }
}

/// Derives the calendar fields the aggregations group on.
pub fn time_fields(dt: &NaiveDateTime) -> TimeFields {
    TimeFields {
        year: dt.year(),
        month: dt.format("%B").to_string(),
        month_num: dt.month(),
        day_name: dt.format("%A").to_string(),
        only_date: dt.date(),
        period: period_label(dt.hour()),
    }
}

/// Parses `timestamp` and derives its calendar fields in one step.
pub fn derive_time_fields(timestamp: &str) -> Result<TimeFields> {
    parse_timestamp(timestamp)
        .map(|dt| time_fields(&dt))
        .ok_or_else(|| StatsError::Timestamp(timestamp.to_string()))
}
