use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unrecognised timestamp: {0}")]
    Timestamp(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Output error: {0}")]
    Output(String),
}

pub type Result<T> = std::result::Result<T, StatsError>;
