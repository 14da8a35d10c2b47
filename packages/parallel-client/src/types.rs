use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Candidate generator tier. Trades cost for recall and match quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Generator {
    /// $0.25 per run + $0.03 per match.
    Base,
    /// $2 per run + $0.15 per match.
    #[default]
    Core,
    /// $10 per run + $1 per match.
    Pro,
}

impl Generator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Core => "core",
            Self::Pro => "pro",
        }
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Generator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base" => Ok(Self::Base),
            "core" => Ok(Self::Core),
            "pro" => Ok(Self::Pro),
            other => Err(format!(
                "unknown generator '{}' (expected base, core or pro)",
                other
            )),
        }
    }
}

/// A named natural-language condition every match must satisfy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCondition {
    pub name: String,
    pub description: String,
}

impl MatchCondition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Body of `POST /v1beta/findall/runs`.
#[derive(Debug, Clone, Serialize)]
pub struct FindAllRunInput {
    pub objective: String,
    pub entity_type: String,
    pub match_conditions: Vec<MatchCondition>,
    pub generator: Generator,
    pub match_limit: u32,
}

/// FindAll run metadata as returned by create and retrieve.
#[derive(Debug, Clone, Deserialize)]
pub struct FindAllRun {
    pub findall_id: String,
    pub status: RunStatus,
}

impl FindAllRun {
    /// Only `completed` ends polling; every other state is treated as in-flight.
    pub fn is_completed(&self) -> bool {
        self.status.status == "completed"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunStatus {
    pub status: String,
    #[serde(default)]
    pub metrics: RunMetrics,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunMetrics {
    #[serde(default)]
    pub generated_candidates_count: Option<u64>,
    #[serde(default)]
    pub matched_candidates_count: Option<u64>,
}

/// Result of a completed run. Candidate shape is left to the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct FindAllResult<T> {
    #[serde(default = "Vec::new")]
    pub candidates: Vec<T>,
}
