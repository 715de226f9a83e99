// src/errors.rs
use thiserror::Error;

/// Failure classes that can stop a step. Recoverable conditions (malformed
/// replies, retry exhaustion, integrity violations) never show up here;
/// they surface through the log only.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("completion request failed: {0}")]
    Http(#[from] Box<ureq::Error>),

    #[error("could not decode completion payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not read result table: {0}")]
    Csv(#[from] csv::Error),

    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,

    #[error("malformed persona on line {line}: expected 'name|description'")]
    MalformedPersona { line: usize },

    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),
}

pub type SimResult<T> = Result<T, SimError>;
