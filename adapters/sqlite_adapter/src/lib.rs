use chat_core::domain::{ChatRecord, GROUP_NOTIFICATION};
use chat_core::ports::RecordRepository;
use chat_core::utils::derive_time_fields;
use chat_core::{Result, StatsError};
use rusqlite::{Connection, Row};
use tracing::info;

/// SQLite implementation of the RecordRepository trait
pub struct SqliteRecordRepository {
    db_path: String,
    table: String,
}

fn repository_error(e: rusqlite::Error) -> StatsError {
    StatsError::Repository(e.to_string())
}

impl SqliteRecordRepository {
    /// Creates a new SqliteRecordRepository reading the `messages` table
    pub fn new(db_path: String) -> Self {
        Self {
            db_path,
            table: "messages".to_string(),
        }
    }

    /// Reads from `table` instead of `messages`
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    fn validated_table(&self) -> Result<&str> {
        let valid = !self.table.is_empty()
            && self
                .table
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if valid {
            Ok(&self.table)
        } else {
            Err(StatsError::Repository(format!(
                "invalid table name: {:?}",
                self.table
            )))
        }
    }
}

impl RecordRepository for SqliteRecordRepository {
    fn fetch_all_records(&self) -> Result<Vec<ChatRecord>> {
        let table = self.validated_table()?;
        let conn = Connection::open(&self.db_path).map_err(repository_error)?;

        // Rows come back in insertion (export) order; a missing sender is a system notice
        let sql = format!(
            r#"
            SELECT
                COALESCE(user, '{GROUP_NOTIFICATION}') AS user,
                COALESCE(message, '') AS message,
                COALESCE(date, '') AS date
            FROM {table}
            ORDER BY rowid ASC
            "#
        );
        let mut stmt = conn.prepare(&sql).map_err(repository_error)?;

        let rows = stmt
            .query_map([], |row: &Row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })
            .map_err(repository_error)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()
            .map_err(repository_error)?;

        let records = rows
            .into_iter()
            .map(|(user, message, date)| {
                let time = derive_time_fields(&date)?;
                Ok(ChatRecord::new(user, message, time))
            })
            .collect::<Result<Vec<_>>>()?;

        info!(path = %self.db_path, records = records.len(), "Loaded records from SQLite");
        Ok(records)
    }
}
