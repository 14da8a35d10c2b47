//! LLM prompts for deal-term extraction.

/// System message for every extraction call.
pub const SYSTEM_PROMPT: &str =
    "You are a precise data extraction assistant. Return only valid JSON.";

/// User prompt template. `{candidate}` is replaced with the candidate's
/// pretty-printed JSON.
///
/// Besides the nine deal-term fields it asks for `total_deal_value_usd` and
/// `therapeutic_area`, which the normalizer reads; `therapeutic_area` backs
/// `TherapeuticAreaMode::Extracted`.
pub const EXTRACTION_PROMPT: &str = r#"You are parsing biotech deal data. Extract the following fields from the data below.
If a field is not mentioned or cannot be determined, return null for that field.

Required fields to extract:
- date_announced: Date in YYYY-MM-DD format
- target_company: Name of target/partner company being acquired/licensed
- acquirer_company: Name of acquiring/partnering company
- development_stage: Exact stage (preclinical, phase 1, phase 1b, etc.) - do NOT use generic terms
- asset_name: Drug/asset/technology name
- mechanism_of_action: Exact name of gene or pathway target
- deal_type: One of: M&A, licensing, option-to-license, partnership
- upfront_value_usd: Upfront payment in millions USD (number only, or null)
- milestone_value_usd: Total milestone/contingent payments in millions USD (number only, or null)
- total_deal_value_usd: Total deal value in millions USD (number only, or null)
- therapeutic_area: Therapeutic area of the lead asset (e.g. Immunology & Inflammation)

Deal data:
{candidate}

Return ONLY a JSON object with the extracted fields. Use null for missing data."#;

pub fn extraction_prompt(candidate_json: &str) -> String {
    EXTRACTION_PROMPT.replace("{candidate}", candidate_json)
}
