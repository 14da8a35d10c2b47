//! Record normalizer: raw extraction output to a typed [`Deal`].
//!
//! Each rule is a standalone function. `normalize` composes them and only
//! fails when the assembled record would be invalid.

use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use thiserror::Error;

use crate::types::extraction as field;
use crate::types::{Candidate, Deal, DealTypeDetailed, ExtractionResult};

pub const TARGET_MAX_CHARS: usize = 200;
pub const ACQUIRER_MAX_CHARS: usize = 200;
pub const STAGE_MAX_CHARS: usize = 50;
pub const THERAPEUTIC_AREA_MAX_CHARS: usize = 100;
pub const ASSET_FOCUS_MAX_CHARS: usize = 200;
pub const MECHANISM_MAX_CHARS: usize = 200;
pub const KEY_EVIDENCE_MAX_CHARS: usize = 500;

pub const DEFAULT_ACQUIRER: &str = "Partner";
pub const DEFAULT_STAGE: &str = "unknown";
pub const DEFAULT_SOURCE_URL: &str = "https://example.com";
pub const DEFAULT_THERAPEUTIC_AREA: &str = "Immunology & Inflammation";

/// Uniform confidence assigned to every extracted deal.
pub fn default_confidence() -> Decimal {
    Decimal::new(5, 1)
}

/// Where `therapeutic_area` comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TherapeuticAreaMode {
    /// Use the extracted value, falling back to [`DEFAULT_THERAPEUTIC_AREA`].
    #[default]
    Extracted,
    /// Ignore the extraction and stamp every deal with this value.
    Fixed(String),
}

#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    pub therapeutic_area: TherapeuticAreaMode,
    /// Copy the candidate description into `key_evidence`.
    pub include_evidence: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            therapeutic_area: TherapeuticAreaMode::Extracted,
            include_evidence: true,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("invalid source URL '{url}': {reason}")]
    InvalidSourceUrl { url: String, reason: String },
}

/// Build a [`Deal`] from a candidate and its extraction result.
pub fn normalize(
    candidate: &Candidate,
    extraction: &ExtractionResult,
    options: &NormalizeOptions,
) -> Result<Deal, NormalizeError> {
    let name = candidate.display_name();
    let source_url = validate_source_url(candidate.url.as_deref())?;

    let therapeutic_area = match &options.therapeutic_area {
        TherapeuticAreaMode::Extracted => text_or(
            extraction.text(field::THERAPEUTIC_AREA),
            DEFAULT_THERAPEUTIC_AREA,
            THERAPEUTIC_AREA_MAX_CHARS,
        ),
        TherapeuticAreaMode::Fixed(area) => truncate_chars(area, THERAPEUTIC_AREA_MAX_CHARS),
    };

    let key_evidence = if options.include_evidence {
        candidate
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(|d| truncate_chars(d, KEY_EVIDENCE_MAX_CHARS))
    } else {
        None
    };

    Ok(Deal {
        date_announced: parse_date(extraction.text(field::DATE_ANNOUNCED).as_deref()),
        target: text_or(extraction.text(field::TARGET_COMPANY), name, TARGET_MAX_CHARS),
        acquirer: text_or(
            extraction.text(field::ACQUIRER_COMPANY),
            DEFAULT_ACQUIRER,
            ACQUIRER_MAX_CHARS,
        ),
        stage: text_or(
            extraction.text(field::DEVELOPMENT_STAGE),
            DEFAULT_STAGE,
            STAGE_MAX_CHARS,
        ),
        therapeutic_area,
        asset_focus: text_or(extraction.text(field::ASSET_NAME), name, ASSET_FOCUS_MAX_CHARS),
        mechanism_of_action: extraction
            .text(field::MECHANISM_OF_ACTION)
            .map(|m| truncate_chars(&m, MECHANISM_MAX_CHARS)),
        deal_type_detailed: classify_deal_type(extraction.text(field::DEAL_TYPE).as_deref()),
        source_url,
        upfront_value_usd: coerce_decimal(extraction.get(field::UPFRONT_VALUE_USD)),
        contingent_payment_usd: coerce_decimal(extraction.get(field::MILESTONE_VALUE_USD)),
        total_deal_value_usd: coerce_decimal(extraction.get(field::TOTAL_DEAL_VALUE_USD)),
        geography: None,
        key_evidence,
        confidence: default_confidence(),
        timestamp_utc: Utc::now(),
    })
}

fn validate_source_url(raw: Option<&str>) -> Result<String, NormalizeError> {
    let raw = match raw.map(str::trim) {
        Some(url) if !url.is_empty() => url,
        _ => return Ok(DEFAULT_SOURCE_URL.to_string()),
    };

    let invalid = |reason: String| NormalizeError::InvalidSourceUrl {
        url: raw.to_string(),
        reason,
    };
    let parsed = url::Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(raw.to_string()),
        other => Err(invalid(format!("unsupported scheme '{}'", other))),
    }
}

// =============================================================================
// Rules
// =============================================================================

/// Parse an announcement date, falling back to today. Never fails.
pub fn parse_date(raw: Option<&str>) -> NaiveDate {
    parse_date_or(raw, Local::now().date_naive())
}

/// [`parse_date`] with an explicit fallback date.
///
/// Tries ISO-8601 (date-time with offset, naive date-time, date, compact
/// `YYYYMMDD`) first, then `YYYY-MM-DD`, `Month DD, YYYY` and a bare
/// four-digit `YYYY` (January 1st).
pub fn parse_date_or(raw: Option<&str>, fallback: NaiveDate) -> NaiveDate {
    let Some(s) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return fallback;
    };

    parse_iso8601(s)
        .or_else(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .or_else(|| NaiveDate::parse_from_str(s, "%B %d, %Y").ok())
        .or_else(|| parse_year(s))
        .unwrap_or(fallback)
}

fn parse_iso8601(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    // Offsets without seconds: `2023-03-15T09:30Z`, `2023-03-15T09:30+02:00`
    if let Some(naive) = s.strip_suffix('Z') {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M") {
            return Some(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M%:z") {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::from_str(s).ok().or_else(|| parse_basic_date(s))
}

/// Compact `YYYYMMDD`.
fn parse_basic_date(s: &str) -> Option<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = s[..4].parse().ok()?;
    let month: u32 = s[4..6].parse().ok()?;
    let day: u32 = s[6..].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Exactly four digits.
fn parse_year(s: &str) -> Option<NaiveDate> {
    if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = s.parse().ok()?;
    NaiveDate::from_ymd_opt(year, 1, 1)
}

/// Classify free-text deal type. Order matters: M&A wins over licensing.
pub fn classify_deal_type(raw: Option<&str>) -> DealTypeDetailed {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return DealTypeDetailed::Partnership;
    };
    let lower = raw.to_lowercase();

    if lower.contains("m&a") || lower.contains("acquisition") || lower.contains("merger") {
        DealTypeDetailed::MergerAcquisition
    } else if lower.contains("option") && lower.contains("licens") {
        DealTypeDetailed::OptionToLicense
    } else if lower.contains("licens") {
        DealTypeDetailed::Licensing
    } else {
        DealTypeDetailed::Partnership
    }
}

/// Exact decimal from a JSON number or numeric string; `None` otherwise.
pub fn coerce_decimal(value: Option<&Value>) -> Option<Decimal> {
    let text = match value? {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    if text.is_empty() {
        return None;
    }
    Decimal::from_str_exact(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// `value` unless empty, else `fallback`; truncated to `max_chars`.
pub fn text_or(value: Option<String>, fallback: &str, max_chars: usize) -> String {
    match value.filter(|v| !v.is_empty()) {
        Some(v) => truncate_chars(&v, max_chars),
        None => truncate_chars(fallback, max_chars),
    }
}

/// Keep at most `max_chars` characters, never splitting one.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => s[..byte_idx].to_string(),
        None => s.to_string(),
    }
}
