use chat_core::application::AnalysisReport;
use chat_core::aggregator::FrequencyTable;
use chat_core::ports::ReportWriter;
use chat_core::{Result, StatsError};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Where the rendered report goes.
#[derive(Debug, Clone)]
enum Destination {
    Stdout,
    File(PathBuf),
}

/// Markdown writer adapter implementation
pub struct MarkdownReportWriter {
    destination: Destination,
}

impl MarkdownReportWriter {
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            destination: Destination::File(path.into()),
        }
    }

    pub fn to_stdout() -> Self {
        Self {
            destination: Destination::Stdout,
        }
    }

    /// Formats a frequency table as a two-column markdown table
    fn format_table(output: &mut String, key_header: &str, table: &FrequencyTable) {
        if table.is_empty() {
            output.push_str("*No data*\n\n");
            return;
        }
        output.push_str(&format!("| {} | Count |\n", key_header));
        output.push_str("|---|---|\n");
        for (key, count) in table {
            output.push_str(&format!("| {} | {} |\n", escape_cell(key), count));
        }
        output.push('\n');
    }

    /// Renders every section of the report
    pub fn render(report: &AnalysisReport) -> String {
        let mut output = String::new();
        output.push_str(&format!("# Chat statistics: {}\n\n", report.selected_user));

        let stats = &report.stats;
        output.push_str("## Top statistics\n\n");
        output.push_str(&format!("- **Messages:** {}\n", stats.messages));
        output.push_str(&format!("- **Words:** {}\n", stats.words));
        output.push_str(&format!("- **Media shared:** {}\n", stats.media_messages));
        output.push_str(&format!("- **Links shared:** {}\n\n", stats.links));

        if let Some(busy) = &report.busy_users {
            output.push_str("## Most busy users\n\n");
            output.push_str("| User | Messages |\n|---|---|\n");
            for entry in &busy.top {
                output.push_str(&format!(
                    "| {} | {} |\n",
                    escape_cell(&entry.user),
                    entry.messages
                ));
            }
            output.push_str("\n| User | Percent |\n|---|---|\n");
            for share in &busy.shares {
                output.push_str(&format!(
                    "| {} | {:.2} |\n",
                    escape_cell(&share.user),
                    share.percent
                ));
            }
            output.push('\n');
        }

        output.push_str("## Monthly timeline\n\n");
        if report.monthly_timeline.is_empty() {
            output.push_str("*No data*\n\n");
        } else {
            output.push_str("| Month | Messages |\n|---|---|\n");
            for bucket in &report.monthly_timeline {
                output.push_str(&format!("| {} | {} |\n", bucket.label(), bucket.messages));
            }
            output.push('\n');
        }

        output.push_str("## Daily timeline\n\n");
        if report.daily_timeline.is_empty() {
            output.push_str("*No data*\n\n");
        } else {
            output.push_str("| Date | Messages |\n|---|---|\n");
            for bucket in &report.daily_timeline {
                output.push_str(&format!("| {} | {} |\n", bucket.date, bucket.messages));
            }
            output.push('\n');
        }

        output.push_str("## Most busy day\n\n");
        Self::format_table(&mut output, "Day", &report.weekly_activity);

        output.push_str("## Most busy month\n\n");
        Self::format_table(&mut output, "Month", &report.monthly_activity);

        output.push_str("## Weekly activity map\n\n");
        let heatmap = &report.heatmap;
        if heatmap.is_empty() {
            output.push_str("*No data*\n\n");
        } else {
            output.push_str(&format!("| Day | {} |\n", heatmap.periods.join(" | ")));
            output.push_str(&format!("|---|{}\n", "---|".repeat(heatmap.periods.len())));
            for (day, row) in heatmap.days.iter().zip(&heatmap.cells) {
                let cells: Vec<String> = row.iter().map(|n| n.to_string()).collect();
                output.push_str(&format!("| {} | {} |\n", day, cells.join(" | ")));
            }
            output.push('\n');
        }

        output.push_str("## Most common words\n\n");
        Self::format_table(&mut output, "Word", &report.common_words);

        output.push_str("## Emoji analysis\n\n");
        Self::format_table(&mut output, "Emoji", &report.emojis);

        output
    }

    fn write_file(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        info!(path = %path.display(), "Wrote markdown report");
        Ok(())
    }
}

/// Keeps user text from breaking the table layout
fn escape_cell(text: &str) -> String {
    text.trim().replace('|', "\\|").replace('\n', " ")
}

impl ReportWriter for MarkdownReportWriter {
    fn write(&self, report: &AnalysisReport) -> Result<()> {
        let content = Self::render(report);
        match &self.destination {
            Destination::File(path) => Self::write_file(path, &content),
            Destination::Stdout => std::io::stdout()
                .lock()
                .write_all(content.as_bytes())
                .map_err(|e| StatsError::Output(e.to_string())),
        }
    }
}
