//! Structured JSON summary of a run (`openai_parsed_<timestamp>.json`).

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DealFinderError, Result};
use crate::types::{Deal, FailedParse, RunTimestamp};

/// A deal with every field rendered as a string (or null).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealRecord {
    pub date_announced: String,
    pub target: String,
    pub acquirer: String,
    pub stage: String,
    pub therapeutic_area: String,
    pub asset_focus: String,
    pub mechanism_of_action: Option<String>,
    pub deal_type: String,
    pub source_url: String,
    pub upfront_value_usd: Option<String>,
    pub contingent_payment_usd: Option<String>,
    pub total_deal_value_usd: Option<String>,
    pub geography: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub key_evidence: Option<String>,
    pub confidence: String,
    pub timestamp_utc: String,
}

fn money(value: Option<Decimal>) -> Option<String> {
    value.map(|d| d.to_string())
}

impl From<&Deal> for DealRecord {
    fn from(deal: &Deal) -> Self {
        Self {
            date_announced: deal.date_announced.format("%Y-%m-%d").to_string(),
            target: deal.target.clone(),
            acquirer: deal.acquirer.clone(),
            stage: deal.stage.clone(),
            therapeutic_area: deal.therapeutic_area.clone(),
            asset_focus: deal.asset_focus.clone(),
            mechanism_of_action: deal.mechanism_of_action.clone(),
            deal_type: deal.deal_type_detailed.to_string(),
            source_url: deal.source_url.clone(),
            upfront_value_usd: money(deal.upfront_value_usd),
            contingent_payment_usd: money(deal.contingent_payment_usd),
            total_deal_value_usd: money(deal.total_deal_value_usd),
            geography: deal.geography.clone(),
            key_evidence: deal.key_evidence.clone(),
            confidence: deal.confidence.to_string(),
            timestamp_utc: deal.timestamp_utc.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub timestamp: String,
    pub total_deals: usize,
    pub failed_parses: Vec<FailedParse>,
    pub deals: Vec<DealRecord>,
}

impl RunSummary {
    pub fn new(timestamp: &RunTimestamp, deals: &[Deal], failed: &[FailedParse]) -> Self {
        Self {
            timestamp: timestamp.to_string(),
            total_deals: deals.len(),
            failed_parses: failed.to_vec(),
            deals: deals.iter().map(DealRecord::from).collect(),
        }
    }
}

pub fn write_summary(path: &Path, summary: &RunSummary) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| DealFinderError::io(parent, e))?;
    }
    let data = serde_json::to_string_pretty(summary)?;
    fs::write(path, data).map_err(|e| DealFinderError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DealTypeDetailed;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn sample_deal() -> Deal {
        Deal {
            date_announced: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            target: "Gamma Bio".into(),
            acquirer: "Delta Pharma".into(),
            stage: "Phase 1".into(),
            therapeutic_area: "Immunology & Inflammation".into(),
            asset_focus: "GX-101".into(),
            mechanism_of_action: None,
            deal_type_detailed: DealTypeDetailed::OptionToLicense,
            source_url: "https://x.com".into(),
            upfront_value_usd: Some(Decimal::new(1500, 2)),
            contingent_payment_usd: None,
            total_deal_value_usd: Some(Decimal::ZERO),
            geography: None,
            key_evidence: None,
            confidence: Decimal::new(5, 1),
            timestamp_utc: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    #[test]
    fn test_record_stringifies_fields() {
        let record = DealRecord::from(&sample_deal());
        assert_eq!(record.date_announced, "2023-06-01");
        assert_eq!(record.deal_type, "option-to-license");
        assert_eq!(record.upfront_value_usd.as_deref(), Some("15.00"));
        assert_eq!(record.contingent_payment_usd, None);
        assert_eq!(record.total_deal_value_usd.as_deref(), Some("0"));
        assert_eq!(record.confidence, "0.5");
        assert_eq!(record.timestamp_utc, "2026-01-02T03:04:05+00:00");

        let json = serde_json::to_value(&record).unwrap();
        assert!(json["contingent_payment_usd"].is_null());
        assert!(json.get("key_evidence").is_none());
    }

    #[test]
    fn test_write_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("openai_parsed_20251118_184341.json");
        let failed = vec![FailedParse {
            index: 3,
            name: Some("Broken".into()),
            error: "bad url".into(),
        }];
        let summary = RunSummary::new(&"20251118_184341".parse().unwrap(), &[sample_deal()], &failed);

        write_summary(&path, &summary).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["timestamp"], "20251118_184341");
        assert_eq!(json["total_deals"], 1);
        assert_eq!(json["failed_parses"][0]["index"], 3);
        assert_eq!(json["failed_parses"][0]["name"], "Broken");
        assert_eq!(json["deals"][0]["target"], "Gamma Bio");
    }
}
