//! Human-readable run summary for the terminal.

use std::fmt::Write;

use crate::types::Deal;

pub const SAMPLE_LIMIT: usize = 5;

/// Up to `limit` deals, one short block each.
pub fn format_samples(deals: &[Deal], limit: usize) -> String {
    let mut out = String::new();
    for (i, deal) in deals.iter().take(limit).enumerate() {
        let _ = writeln!(out, "{}. {} / {}", i + 1, deal.target, deal.acquirer);
        let _ = writeln!(
            out,
            "   {} | {} | {}",
            deal.stage, deal.therapeutic_area, deal.date_announced
        );
        if let Some(upfront) = deal.upfront_value_usd {
            let _ = writeln!(out, "   Upfront: ${}M", upfront);
        }
        if let Some(milestones) = deal.contingent_payment_usd {
            let _ = writeln!(out, "   Milestones: ${}M", milestones);
        }
        if let Some(total) = deal.total_deal_value_usd {
            let _ = writeln!(out, "   Total value: ${}M", total);
        }
    }
    out
}

pub fn print_samples(deals: &[Deal]) {
    if deals.is_empty() {
        return;
    }
    println!("\nSample deals:");
    print!("{}", format_samples(deals, SAMPLE_LIMIT));
}
