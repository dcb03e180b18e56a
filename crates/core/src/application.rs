use crate::aggregator::{
    self, BasicStats, BusyUsers, DailyBucket, FrequencyTable, Heatmap, MonthlyBucket,
};
use crate::domain::{ChatRecord, GROUP_NOTIFICATION, OVERALL};
use crate::error::Result;
use crate::ports::{RecordRepository, ReportWriter};
use crate::stop_words::StopWords;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{info, warn};

/// Which user to analyse and how long the ranked tables are.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub selected_user: String,
    pub top_users: usize,
    pub top_words: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            selected_user: OVERALL.to_string(),
            top_users: 5,
            top_words: 20,
        }
    }
}

/// Every summary view for one selection.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub selected_user: String,
    pub stats: BasicStats,
    /// Only computed for the "Overall" selection.
    pub busy_users: Option<BusyUsers>,
    pub monthly_timeline: Vec<MonthlyBucket>,
    pub daily_timeline: Vec<DailyBucket>,
    pub weekly_activity: FrequencyTable,
    pub monthly_activity: FrequencyTable,
    pub heatmap: Heatmap,
    pub common_words: FrequencyTable,
    pub emojis: FrequencyTable,
}

impl AnalysisReport {
    pub fn build(config: &AnalysisConfig, records: &[ChatRecord], stop_words: &StopWords) -> Self {
        let user = config.selected_user.as_str();
        let busy_users =
            (user == OVERALL).then(|| aggregator::top_users(records, config.top_users));

        Self {
            selected_user: user.to_string(),
            stats: aggregator::basic_stats(user, records),
            busy_users,
            monthly_timeline: aggregator::monthly_timeline(user, records),
            daily_timeline: aggregator::daily_timeline(user, records),
            weekly_activity: aggregator::weekly_activity(user, records),
            monthly_activity: aggregator::monthly_activity(user, records),
            heatmap: aggregator::activity_heatmap(user, records),
            common_words: aggregator::word_frequency(user, records, stop_words, config.top_words),
            emojis: aggregator::emoji_frequency(user, records),
        }
    }
}

/// Distinct senders, sorted, with notices removed and "Overall" first.
pub fn list_users(records: &[ChatRecord]) -> Vec<String> {
    let users: BTreeSet<&str> = records
        .iter()
        .map(|r| r.user.as_str())
        .filter(|u| *u != GROUP_NOTIFICATION)
        .collect();

    std::iter::once(OVERALL)
        .chain(users)
        .map(str::to_string)
        .collect()
}

/// Application service that loads records, analyses them and hands the report to a writer
pub struct AnalysisServiceImpl {
    record_repository: Box<dyn RecordRepository>,
    report_writer: Box<dyn ReportWriter>,
}

impl AnalysisServiceImpl {
    /// Creates a new AnalysisServiceImpl with the given dependencies
    pub fn new(
        record_repository: Box<dyn RecordRepository>,
        report_writer: Box<dyn ReportWriter>,
    ) -> Self {
        Self {
            record_repository,
            report_writer,
        }
    }

    /// Executes the analysis: fetches records, builds the report and writes it
    pub fn execute_analysis(
        &self,
        config: &AnalysisConfig,
        stop_words: &StopWords,
    ) -> Result<AnalysisReport> {
        let records = self.record_repository.fetch_all_records()?;
        info!(records = records.len(), user = %config.selected_user, "Analysing chat");

        let known_user = records.iter().any(|r| r.user == config.selected_user);
        if config.selected_user != OVERALL && !known_user {
            warn!(user = %config.selected_user, "Selected user has no messages");
        }

        let report = AnalysisReport::build(config, &records, stop_words);
        self.report_writer.write(&report)?;
        Ok(report)
    }

    /// Users available for selection in the loaded export
    pub fn available_users(&self) -> Result<Vec<String>> {
        let records = self.record_repository.fetch_all_records()?;
        Ok(list_users(&records))
    }
}
