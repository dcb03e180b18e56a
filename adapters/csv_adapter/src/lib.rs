//! CSV ingest for chat records.
//!
//! Accepts either a raw `user,message,date` export or a table whose calendar
//! columns were already derived upstream.

use chat_core::domain::{ChatRecord, TimeFields};
use chat_core::ports::RecordRepository;
use chat_core::utils::derive_time_fields;
use chat_core::{Result, StatsError};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize)]
struct CsvRow {
    user: String,
    message: String,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    year: Option<i32>,
    #[serde(default)]
    month: Option<String>,
    #[serde(default)]
    month_num: Option<u32>,
    #[serde(default)]
    day_name: Option<String>,
    #[serde(default)]
    only_date: Option<NaiveDate>,
    #[serde(default)]
    period: Option<String>,
}

impl CsvRow {
    fn into_record(self, line: usize) -> Result<ChatRecord> {
        let time = match (
            self.year,
            self.month,
            self.month_num,
            self.day_name,
            self.only_date,
            self.period,
        ) {
            (
                Some(year),
                Some(month),
                Some(month_num),
                Some(day_name),
                Some(only_date),
                Some(period),
            ) => TimeFields {
                year,
                month,
                month_num,
                day_name,
                only_date,
                period,
            },
            _ => match self.date.as_deref() {
                Some(date) => derive_time_fields(date)?,
                None => {
                    return Err(StatsError::Repository(format!(
                        "line {line}: needs a date column or all derived time columns"
                    )))
                }
            },
        };
        Ok(ChatRecord::new(self.user, self.message, time))
    }
}

/// CSV implementation of the RecordRepository trait
pub struct CsvRecordRepository {
    path: PathBuf,
}

impl CsvRecordRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordRepository for CsvRecordRepository {
    fn fetch_all_records(&self) -> Result<Vec<ChatRecord>> {
        let csv_error =
            |e: csv::Error| StatsError::Repository(format!("{}: {e}", self.path.display()));

        let mut reader = csv::Reader::from_path(&self.path).map_err(csv_error)?;
        let mut records = Vec::new();
        for (i, row) in reader.deserialize::<CsvRow>().enumerate() {
            let row = row.map_err(csv_error)?;
            // header is line 1
            records.push(row.into_record(i + 2)?);
        }

        info!(path = %self.path.display(), records = records.len(), "Loaded records from CSV");
        Ok(records)
    }
}
