//! Candidate types - raw matches returned by the search provider.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Display name used when a candidate carries no `name`.
pub const UNKNOWN_NAME: &str = "Unknown";

/// The search provider's own relevance verdict for a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MatchStatus {
    Matched,
    Unmatched,
    /// Any status this crate does not know about, kept verbatim.
    Other(String),
}

impl From<String> for MatchStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "matched" => Self::Matched,
            "unmatched" => Self::Unmatched,
            _ => Self::Other(value),
        }
    }
}

impl From<MatchStatus> for String {
    fn from(value: MatchStatus) -> Self {
        match value {
            MatchStatus::Matched => "matched".to_string(),
            MatchStatus::Unmatched => "unmatched".to_string(),
            MatchStatus::Other(other) => other,
        }
    }
}

/// A raw search match, not yet validated as relevant.
///
/// Known fields are typed; everything else the provider sent (match
/// reasoning, citations, enrichments) is kept in `extra` so the record
/// serializes back exactly as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_status: Option<MatchStatus>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Candidate {
    /// Create a matched candidate with the given id and name.
    pub fn matched(candidate_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            candidate_id: Some(candidate_id.into()),
            name: Some(name.into()),
            match_status: Some(MatchStatus::Matched),
            ..Default::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_matched(&self) -> bool {
        self.match_status == Some(MatchStatus::Matched)
    }

    /// Cache key: the provider id, or `candidate_<index>` when it is missing.
    pub fn cache_key(&self, index: usize) -> String {
        self.candidate_id
            .clone()
            .unwrap_or_else(|| format!("candidate_{}", index))
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let raw = r#"{
            "candidate_id": "c1",
            "name": "Acme Bio",
            "match_status": "matched",
            "output": {"deal_value": {"value": "undisclosed"}},
            "basis": [{"field": "name", "citations": []}]
        }"#;
        let candidate: Candidate = serde_json::from_str(raw).unwrap();
        assert!(candidate.is_matched());
        assert_eq!(candidate.extra.len(), 2);

        let back = serde_json::to_value(&candidate).unwrap();
        assert_eq!(back["output"]["deal_value"]["value"], "undisclosed");
        assert_eq!(back["match_status"], "matched");
        assert!(back.get("url").is_none());
    }

    #[test]
    fn test_unrecognized_status_is_kept() {
        let candidate: Candidate =
            serde_json::from_str(r#"{"match_status": "generated"}"#).unwrap();
        assert_eq!(
            candidate.match_status,
            Some(MatchStatus::Other("generated".into()))
        );
        assert!(!candidate.is_matched());
    }

    #[test]
    fn test_cache_key_falls_back_to_index() {
        let mut candidate = Candidate::matched("cand_42", "Acme");
        assert_eq!(candidate.cache_key(3), "cand_42");

        candidate.candidate_id = None;
        assert_eq!(candidate.cache_key(3), "candidate_3");
    }

    #[test]
    fn test_display_name_default() {
        assert_eq!(Candidate::default().display_name(), "Unknown");
    }
}
