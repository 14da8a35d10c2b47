//! Run outputs: JSON summary, spreadsheet and console samples.

pub mod console;
pub mod excel;
pub mod summary;

use std::path::PathBuf;

pub use console::{format_samples, print_samples};
pub use excel::ExcelWriter;
pub use summary::{write_summary, DealRecord, RunSummary};

use crate::error::Result;
use crate::pipeline::PipelineOutcome;
use crate::types::OutputLayout;

/// Files written by [`write_reports`].
#[derive(Debug, Clone)]
pub struct ReportFiles {
    pub summary: PathBuf,
    /// `None` when there were no deals to export.
    pub spreadsheet: Option<PathBuf>,
}

/// Write the summary file and, when there is at least one deal, the
/// spreadsheet. Write failures propagate.
pub fn write_reports(layout: &OutputLayout, outcome: &PipelineOutcome) -> Result<ReportFiles> {
    let summary_path = layout.summary();
    let summary = RunSummary::new(layout.timestamp(), &outcome.deals, &outcome.failed);
    write_summary(&summary_path, &summary)?;
    tracing::info!(path = %summary_path.display(), "Summary written");

    let spreadsheet = if outcome.deals.is_empty() {
        tracing::warn!("No deals to export, skipping spreadsheet");
        None
    } else {
        let path = layout.spreadsheet();
        ExcelWriter::new().write(&outcome.deals, &path)?;
        Some(path)
    };

    Ok(ReportFiles {
        summary: summary_path,
        spreadsheet,
    })
}
