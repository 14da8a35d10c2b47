//! Typed errors for the deal pipeline.
//!
//! Library code returns `DealFinderError`; the binary wraps it in `anyhow`.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DealFinderError>;

#[derive(Debug, Error)]
pub enum DealFinderError {
    /// Reading or writing a run file failed
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A run file exists but is not the JSON we expect
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Serializing an in-memory value failed
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("spreadsheet export failed: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("invalid run timestamp '{0}' (expected YYYYMMDD_HHMMSS)")]
    InvalidTimestamp(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl DealFinderError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

/// Why a single extraction call produced nothing usable.
///
/// Never leaves the extractor: callers see an empty result instead.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("extraction provider failed: {0}")]
    Provider(#[from] openai_client::OpenAIError),

    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("could not serialize candidate: {0}")]
    Candidate(#[from] serde_json::Error),
}
