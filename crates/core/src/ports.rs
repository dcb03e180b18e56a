use crate::application::AnalysisReport;
use crate::domain::ChatRecord;
use crate::error::Result;

/// Source of parsed chat records.
pub trait RecordRepository {
    // Loads every record in export order
    fn fetch_all_records(&self) -> Result<Vec<ChatRecord>>;
}

/// Destination for a finished analysis report
/// Implementations decide the format and where it ends up (file, stdout)
pub trait ReportWriter: Send + Sync {
    fn write(&self, report: &AnalysisReport) -> Result<()>;
}
