//! Candidate filter: keep what the search provider marked as matched.

use crate::types::Candidate;

/// Counts for one filtering pass. `matched + excluded == total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSummary {
    pub total: usize,
    pub matched: usize,
    pub excluded: usize,
}

/// Matched candidates in input order.
pub fn filter_matched(candidates: &[Candidate]) -> (Vec<Candidate>, FilterSummary) {
    let matched: Vec<Candidate> = candidates
        .iter()
        .filter(|c| c.is_matched())
        .cloned()
        .collect();

    let summary = FilterSummary {
        total: candidates.len(),
        matched: matched.len(),
        excluded: candidates.len() - matched.len(),
    };
    (matched, summary)
}
