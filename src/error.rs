use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Completion API error: {0}")]
    CompletionApi(String),

    #[error("Airtable API error: {0}")]
    Airtable(String),

    #[error("Failed to parse {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Please edit {} and add your OpenAI API key", .0.display())]
    ConfigCreated(PathBuf),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Transport-class failures that are worth another attempt after a pause.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::CompletionApi(_) | Error::Network(_))
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::ParseError {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
