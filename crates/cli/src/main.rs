use anyhow::Context;
use chat_core::application::{AnalysisConfig, AnalysisServiceImpl};
use chat_core::domain::OVERALL;
use chat_core::ports::{RecordRepository, ReportWriter};
use chat_core::stop_words::StopWords;
use clap::{Parser, ValueEnum};
use csv_adapter::CsvRecordRepository;
use markdown_adapter::MarkdownReportWriter;
use sqlite_adapter::SqliteRecordRepository;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    Sqlite,
    Csv,
}

impl InputFormat {
    /// `.csv` files are CSV, anything else is treated as a SQLite database
    fn infer(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => InputFormat::Csv,
            _ => InputFormat::Sqlite,
        }
    }
}

/// CLI tool to compute descriptive statistics over a parsed chat export
#[derive(Parser, Debug)]
#[command(name = "chat-stats")]
#[command(about = "Computes message, word, emoji and activity statistics for a chat export")]
struct Cli {
    /// Path to the parsed chat export (SQLite database or CSV file)
    #[arg(short = 'i', long = "input", required = true)]
    input: PathBuf,

    /// Input format; inferred from the file extension when omitted
    #[arg(short = 'f', long = "format", value_enum)]
    format: Option<InputFormat>,

    /// User to analyse, or "Overall" for everyone
    #[arg(short = 'u', long = "user", default_value = OVERALL)]
    user: String,

    /// Stop-word file (whitespace or line separated)
    #[arg(short = 's', long = "stop-words", default_value = "stop_hinglish.txt")]
    stop_words: PathBuf,

    /// Where the Markdown report is written; stdout when omitted
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Number of users in the busiest-users table
    #[arg(long = "top-users", default_value_t = 5)]
    top_users: usize,

    /// Number of words in the most-common-words table
    #[arg(long = "top-words", default_value_t = 20)]
    top_words: usize,

    /// Print the selectable users and exit
    #[arg(long = "list-users")]
    list_users: bool,

    /// Enable debug logging
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Instantiate concrete implementations of secondary adapters
    let format = cli.format.unwrap_or_else(|| InputFormat::infer(&cli.input));
    let record_repository: Box<dyn RecordRepository> = match format {
        InputFormat::Sqlite => Box::new(SqliteRecordRepository::new(
            cli.input.to_string_lossy().into_owned(),
        )),
        InputFormat::Csv => Box::new(CsvRecordRepository::new(cli.input.clone())),
    };

    let report_writer: Box<dyn ReportWriter> = match &cli.output {
        Some(path) => Box::new(MarkdownReportWriter::to_file(path.clone())),
        None => Box::new(MarkdownReportWriter::to_stdout()),
    };

    // Instantiate the core business service with dependency injection
    let service = AnalysisServiceImpl::new(record_repository, report_writer);

    if cli.list_users {
        let users = service
            .available_users()
            .with_context(|| format!("failed to read {}", cli.input.display()))?;
        for user in users {
            println!("{user}");
        }
        return Ok(());
    }

    let stop_words = StopWords::load(&cli.stop_words)
        .with_context(|| format!("failed to read stop words from {}", cli.stop_words.display()))?;

    let config = AnalysisConfig {
        selected_user: cli.user,
        top_users: cli.top_users,
        top_words: cli.top_words,
    };

    service
        .execute_analysis(&config, &stop_words)
        .with_context(|| format!("failed to analyse {}", cli.input.display()))?;

    if let Some(path) = &cli.output {
        tracing::info!(path = %path.display(), "Report written");
    }
    Ok(())
}
