//! The deal search definition and its raw results file.
//!
//! Search itself is delegated to Parallel FindAll; this module only says
//! what to look for and how raw results are saved and reloaded.

use std::fs;
use std::path::Path;

use parallel_client::{FindAllRunInput, Generator, MatchCondition};
use serde::{Deserialize, Serialize};

use crate::error::{DealFinderError, Result};
use crate::types::{Candidate, RunTimestamp};

pub const ENTITY_TYPE: &str = "deals";
pub const DEFAULT_MATCH_LIMIT: u32 = 500;

pub const OBJECTIVE: &str = "Find all early-stage (lead asset is preclinical or phase 1 but hasn't started phase 2) Immunology & Inflammation (Oncology is ok if I&I related) biotech deals (M&A, partnerships, licensing, option-to-license) that have happened since 2021-01-01";

/// What qualifies a candidate as a match.
pub fn match_conditions() -> Vec<MatchCondition> {
    vec![
        MatchCondition::new(
            "immunology_inflammation_check",
            "Deal must be in Immunology & Inflammation (Oncology is ok if I&I related).",
        ),
        MatchCondition::new(
            "early_stage_check",
            "The lead asset at the time of the deal announcement must be in preclinical development OR phase 1 clinical trials. The asset must NOT have started phase 2 trials yet. Do not include deals where the asset is described as 'clinical-stage' without specific phase information - only include if explicitly stated as preclinical or phase 1.",
        ),
        MatchCondition::new(
            "biotech_check",
            "Deal must be a biotech deal (M&A, partnerships, licensing, option-to-license).",
        ),
        MatchCondition::new(
            "since_2021_01_01_check",
            "Deal must have happened since 2021-01-01.",
        ),
        MatchCondition::new(
            "deal_value_check",
            "Deal must mention financial terms (upfront value, milestones, total deal value) OR be described as 'undisclosed', 'not disclosed', or 'terms not disclosed'. This should match nearly all deals.",
        ),
    ]
}

pub fn run_input(generator: Generator, match_limit: u32) -> FindAllRunInput {
    FindAllRunInput {
        objective: OBJECTIVE.to_string(),
        entity_type: ENTITY_TYPE.to_string(),
        match_conditions: match_conditions(),
        generator,
        match_limit,
    }
}

/// Contents of `parallel_raw_<timestamp>.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSearchResults {
    #[serde(default)]
    pub run_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub total_candidates: usize,
    #[serde(default)]
    pub matched_candidates: usize,
    /// Every candidate, matched or not.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl RawSearchResults {
    pub fn new(run_id: impl Into<String>, timestamp: &RunTimestamp, candidates: Vec<Candidate>) -> Self {
        let matched = candidates.iter().filter(|c| c.is_matched()).count();
        Self {
            run_id: Some(run_id.into()),
            timestamp: Some(timestamp.to_string()),
            total_candidates: candidates.len(),
            matched_candidates: matched,
            candidates,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|e| DealFinderError::io(path, e))?;
        serde_json::from_str(&data).map_err(|e| DealFinderError::json(path, e))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| DealFinderError::io(parent, e))?;
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data).map_err(|e| DealFinderError::io(path, e))
    }
}
