//! The normalized deal record.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Deal structure, as classified from the extracted `deal_type` text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DealTypeDetailed {
    #[serde(rename = "M&A")]
    MergerAcquisition,
    #[serde(rename = "licensing")]
    Licensing,
    #[serde(rename = "option-to-license")]
    OptionToLicense,
    #[serde(rename = "partnership")]
    Partnership,
}

impl DealTypeDetailed {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MergerAcquisition => "M&A",
            Self::Licensing => "licensing",
            Self::OptionToLicense => "option-to-license",
            Self::Partnership => "partnership",
        }
    }
}

impl fmt::Display for DealTypeDetailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One biotech transaction. Always fully populated before it is collected.
#[derive(Debug, Clone, PartialEq)]
pub struct Deal {
    pub date_announced: NaiveDate,
    pub target: String,
    pub acquirer: String,
    pub stage: String,
    pub therapeutic_area: String,
    pub asset_focus: String,
    pub mechanism_of_action: Option<String>,
    pub deal_type_detailed: DealTypeDetailed,
    pub source_url: String,
    /// Millions of USD.
    pub upfront_value_usd: Option<Decimal>,
    /// Millions of USD.
    pub contingent_payment_usd: Option<Decimal>,
    /// Millions of USD.
    pub total_deal_value_usd: Option<Decimal>,
    pub geography: Option<String>,
    pub key_evidence: Option<String>,
    pub confidence: Decimal,
    pub timestamp_utc: DateTime<Utc>,
}

/// A candidate that could not be turned into a [`Deal`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedParse {
    /// Position in the matched candidate list.
    pub index: usize,
    pub name: Option<String>,
    pub error: String,
}
