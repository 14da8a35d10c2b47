use std::env;
use std::path::PathBuf;

use parallel_client::Generator;

use crate::error::{DealFinderError, Result};
use crate::extractor::DEFAULT_MODEL;

pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Application configuration loaded from environment variables.
///
/// Only the binary reads the environment; the pipeline receives explicit
/// values so tests never have to mutate process state.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openai_api_key: Option<String>,
    pub parallel_api_key: Option<String>,
    /// Saved FindAll output to resume from (`parse` command).
    pub raw_results_file: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub openai_model: String,
    pub generator: Generator,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let generator = match get("PARALLEL_GENERATOR") {
            Some(raw) => raw
                .parse()
                .map_err(|e| DealFinderError::Config(format!("PARALLEL_GENERATOR: {}", e)))?,
            None => Generator::default(),
        };

        Ok(Self {
            openai_api_key: get("OPENAI_API_KEY"),
            parallel_api_key: get("PARALLEL_API_KEY"),
            raw_results_file: get("PARALLEL_RAW_FILE").map(PathBuf::from),
            output_dir: get("DEAL_FINDER_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            generator,
        })
    }

    pub fn require_openai_key(&self) -> Result<&str> {
        self.openai_api_key
            .as_deref()
            .ok_or_else(|| DealFinderError::Config("OPENAI_API_KEY must be set".into()))
    }

    pub fn require_parallel_key(&self) -> Result<&str> {
        self.parallel_api_key
            .as_deref()
            .ok_or_else(|| DealFinderError::Config("PARALLEL_API_KEY must be set".into()))
    }
}
