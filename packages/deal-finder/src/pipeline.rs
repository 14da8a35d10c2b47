//! Sequential cache-or-extract-then-normalize loop.
//!
//! One candidate at a time, in input order. A new extraction is persisted
//! to the cache before the next candidate starts, so killing the process
//! loses at most the in-flight call.

use std::io::Write;

use crate::cache::ExtractionCache;
use crate::error::Result;
use crate::extractor::DealExtractor;
use crate::normalize::{normalize, truncate_chars, NormalizeOptions};
use crate::types::{Candidate, Deal, FailedParse};

const PROGRESS_NAME_CHARS: usize = 60;

#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub normalize: NormalizeOptions,
    /// Stream a `[i/n] name...` line to stdout, overwriting in place.
    pub show_progress: bool,
}

/// Deals and failures from one pass, in input order.
#[derive(Debug, Default)]
pub struct PipelineOutcome {
    pub deals: Vec<Deal>,
    pub failed: Vec<FailedParse>,
    /// Candidates answered from the cache.
    pub cache_hits: usize,
    /// Candidates sent to the extraction provider.
    pub extracted: usize,
}

pub struct Pipeline<E: DealExtractor> {
    extractor: E,
    cache: ExtractionCache,
    config: PipelineConfig,
}

impl<E: DealExtractor> Pipeline<E> {
    pub fn new(extractor: E, cache: ExtractionCache, config: PipelineConfig) -> Self {
        Self {
            extractor,
            cache,
            config,
        }
    }

    pub fn cache(&self) -> &ExtractionCache {
        &self.cache
    }

    pub fn into_cache(self) -> ExtractionCache {
        self.cache
    }

    /// Process matched candidates.
    ///
    /// Extraction and normalization failures are absorbed per candidate.
    /// Only cache persistence errors abort the run.
    pub async fn process(&mut self, matched: &[Candidate]) -> Result<PipelineOutcome> {
        let total = matched.len();
        let mut outcome = PipelineOutcome::default();

        for (index, candidate) in matched.iter().enumerate() {
            self.report_progress(index, total, candidate);

            let key = candidate.cache_key(index);
            let extraction = match self.cache.lookup(&key) {
                Some(cached) => {
                    outcome.cache_hits += 1;
                    tracing::debug!(candidate_id = %key, "Extraction cache hit");
                    cached.clone()
                }
                None => {
                    outcome.extracted += 1;
                    let result = self.extractor.extract(candidate).await;
                    self.cache.store(key.clone(), result.clone())?;
                    result
                }
            };

            match normalize(candidate, &extraction, &self.config.normalize) {
                Ok(deal) => outcome.deals.push(deal),
                Err(e) => {
                    if self.config.show_progress {
                        println!("\n✗ Failed: {} - {}", candidate.display_name(), e);
                    }
                    tracing::warn!(index, candidate_id = %key, error = %e, "Normalization failed");
                    outcome.failed.push(FailedParse {
                        index,
                        name: candidate.name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            deals = outcome.deals.len(),
            failed = outcome.failed.len(),
            cache_hits = outcome.cache_hits,
            extracted = outcome.extracted,
            "Pipeline pass complete"
        );
        Ok(outcome)
    }

    fn report_progress(&self, index: usize, total: usize, candidate: &Candidate) {
        if !self.config.show_progress {
            return;
        }
        print!(
            "\r  [{}/{}] {}...",
            index + 1,
            total,
            truncate_chars(candidate.display_name(), PROGRESS_NAME_CHARS)
        );
        let _ = std::io::stdout().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockExtractor;
    use crate::types::RunTimestamp;
    use serde_json::json;

    #[tokio::test]
    async fn test_cache_hit_skips_extractor() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = ExtractionCache::create(dir.path(), RunTimestamp::now());
        cache
            .store("c1", json!({"acquirer_company": "Cached Pharma"}).try_into().unwrap())
            .unwrap();

        let mock = MockExtractor::new()
            .with_response("c1", json!({"acquirer_company": "Fresh Pharma"}))
            .with_response("c2", json!({"acquirer_company": "Other Pharma"}));
        let mut pipeline = Pipeline::new(mock.clone(), cache, PipelineConfig::default());

        let candidates = vec![
            Candidate::matched("c1", "One"),
            Candidate::matched("c2", "Two"),
        ];
        let outcome = pipeline.process(&candidates).await.unwrap();

        assert_eq!(mock.calls(), vec!["c2".to_string()]);
        assert_eq!(outcome.cache_hits, 1);
        assert_eq!(outcome.extracted, 1);
        assert_eq!(outcome.deals[0].acquirer, "Cached Pharma");
        assert_eq!(outcome.deals[1].acquirer, "Other Pharma");
        assert_eq!(pipeline.cache().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_id_uses_index_key() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ExtractionCache::create(dir.path(), RunTimestamp::now());
        let mut pipeline = Pipeline::new(MockExtractor::new(), cache, PipelineConfig::default());

        let anonymous = Candidate {
            candidate_id: None,
            ..Candidate::matched("ignored", "Anon")
        };
        pipeline.process(&[anonymous]).await.unwrap();

        assert!(pipeline.cache().lookup("candidate_0").is_some());
    }

    #[tokio::test]
    async fn test_cache_write_failure_halts_run() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the output directory should be.
        let blocked = dir.path().join("output");
        std::fs::write(&blocked, "not a directory").unwrap();

        let cache = ExtractionCache::create(&blocked, RunTimestamp::now());
        let mock = MockExtractor::new();
        let mut pipeline = Pipeline::new(mock.clone(), cache, PipelineConfig::default());

        let candidates = vec![
            Candidate::matched("c1", "One"),
            Candidate::matched("c2", "Two"),
        ];
        let result = pipeline.process(&candidates).await;

        assert!(matches!(result, Err(crate::error::DealFinderError::Io { .. })));
        assert_eq!(mock.calls(), vec!["c1".to_string()]);
    }
}
