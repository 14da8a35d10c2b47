//! Test doubles for the extraction provider.
//!
//! Lets the pipeline run end-to-end without network calls or paid APIs.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::extractor::DealExtractor;
use crate::types::{Candidate, ExtractionResult};

/// A deterministic extractor keyed by candidate id.
///
/// Candidates without a configured response get an empty result, which is
/// what the production extractor returns on failure. Clones share state, so
/// a clone kept by the test sees calls made through the pipeline.
#[derive(Clone, Default)]
pub struct MockExtractor {
    responses: Arc<RwLock<HashMap<String, ExtractionResult>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `candidate_id` with `response` (must be a JSON object).
    pub fn with_response(self, candidate_id: impl Into<String>, response: serde_json::Value) -> Self {
        let result = ExtractionResult::try_from(response)
            .unwrap_or_else(|kind| panic!("mock response must be a JSON object, got {}", kind));
        self.responses
            .write()
            .unwrap()
            .insert(candidate_id.into(), result);
        self
    }

    /// Candidate ids (or names, when the id is missing) in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl DealExtractor for MockExtractor {
    async fn extract(&self, candidate: &Candidate) -> ExtractionResult {
        let key = candidate
            .candidate_id
            .clone()
            .unwrap_or_else(|| candidate.display_name().to_string());
        self.calls.write().unwrap().push(key.clone());

        self.responses
            .read()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_default()
    }
}
