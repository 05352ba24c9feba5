use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum AnnotationError {
    #[error("invalid accession: {0:?}")]
    InvalidAccession(String),

    #[error("page size must be a positive integer, got {0}")]
    InvalidPageSize(u64),

    #[error("invalid search endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("search request failed: {0}")]
    SearchHttp(String),

    #[error("search returned status {status}: {message}")]
    SearchStatus { status: u16, message: String },

    #[error("failed to decode search response: {0}")]
    SearchDecode(String),

    #[error("document has no accession")]
    MissingAccession,

    #[error("malformed characteristic {field}: {reason}")]
    MalformedCharacteristic { field: String, reason: String },

    #[error("csv write failed: {0}")]
    Csv(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}

impl From<csv::Error> for AnnotationError {
    fn from(err: csv::Error) -> Self {
        AnnotationError::Csv(err.to_string())
    }
}
