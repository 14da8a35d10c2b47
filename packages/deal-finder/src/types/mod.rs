//! Data types flowing through the deal pipeline.

pub mod candidate;
pub mod deal;
pub mod extraction;
pub mod run;

pub use candidate::{Candidate, MatchStatus};
pub use deal::{Deal, DealTypeDetailed, FailedParse};
pub use extraction::ExtractionResult;
pub use run::{OutputLayout, RunTimestamp};
