use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParallelError>;

#[derive(Debug, Error)]
pub enum ParallelError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Parallel API error ({status}): {message}")]
    Api { status: u16, message: String },
}
