//! Biotech deal finder.
//!
//! Pulls candidate deals from Parallel FindAll, extracts deal terms from
//! each one with an LLM, normalizes them into [`Deal`] records and exports
//! a JSON summary plus a spreadsheet.
//!
//! # Usage
//!
//! ```rust,ignore
//! use deal_finder::{filter_matched, ExtractionCache, OpenAiExtractor, Pipeline, PipelineConfig};
//!
//! let (matched, _) = filter_matched(&raw.candidates);
//! let cache = ExtractionCache::discover(Path::new("output"))?;
//! let extractor = OpenAiExtractor::new(OpenAIClient::from_env()?);
//!
//! let mut pipeline = Pipeline::new(extractor, cache, PipelineConfig::default());
//! let outcome = pipeline.process(&matched).await?;
//! ```
//!
//! # Modules
//!
//! - [`filter`] - keep only matched candidates
//! - [`cache`] - durable extraction cache, rewritten on every store
//! - [`extractor`] - extraction provider trait and OpenAI implementation
//! - [`normalize`] - defaulting, truncation, dates, deal types, money
//! - [`pipeline`] - the sequential processing loop
//! - [`report`] - JSON summary, spreadsheet, console samples
//! - [`search`] - FindAll search definition and raw results file
//! - [`testing`] - mock extractor

pub mod cache;
pub mod config;
pub mod error;
pub mod extractor;
pub mod filter;
pub mod normalize;
pub mod pipeline;
pub mod prompts;
pub mod report;
pub mod search;
pub mod testing;
pub mod types;

pub use cache::ExtractionCache;
pub use config::AppConfig;
pub use error::{DealFinderError, ExtractError, Result};
pub use extractor::{DealExtractor, OpenAiExtractor};
pub use filter::{filter_matched, FilterSummary};
pub use normalize::{normalize, NormalizeError, NormalizeOptions, TherapeuticAreaMode};
pub use pipeline::{Pipeline, PipelineConfig, PipelineOutcome};
pub use report::{write_reports, ReportFiles};
pub use search::RawSearchResults;
pub use types::{
    Candidate, Deal, DealTypeDetailed, ExtractionResult, FailedParse, MatchStatus, OutputLayout,
    RunTimestamp,
};
