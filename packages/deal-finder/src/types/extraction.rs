//! Extraction results - best-effort fields returned by the LLM.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DATE_ANNOUNCED: &str = "date_announced";
pub const TARGET_COMPANY: &str = "target_company";
pub const ACQUIRER_COMPANY: &str = "acquirer_company";
pub const DEVELOPMENT_STAGE: &str = "development_stage";
pub const ASSET_NAME: &str = "asset_name";
pub const MECHANISM_OF_ACTION: &str = "mechanism_of_action";
pub const DEAL_TYPE: &str = "deal_type";
pub const UPFRONT_VALUE_USD: &str = "upfront_value_usd";
pub const MILESTONE_VALUE_USD: &str = "milestone_value_usd";
pub const TOTAL_DEAL_VALUE_USD: &str = "total_deal_value_usd";
pub const THERAPEUTIC_AREA: &str = "therapeutic_area";

/// Raw extraction output for one candidate.
///
/// Every field may be missing, null, or of an unexpected JSON type. The
/// map is stored as-is so the cache file mirrors what the provider returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractionResult(Map<String, Value>);

impl ExtractionResult {
    /// The result substituted when extraction fails.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field).filter(|v| !v.is_null())
    }

    /// Field as text. Empty strings count as missing; numbers are rendered.
    pub fn text(&self, field: &str) -> Option<String> {
        match self.get(field)? {
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl TryFrom<Value> for ExtractionResult {
    type Error = &'static str;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Err("null"),
            Value::Bool(_) => Err("a boolean"),
            Value::Number(_) => Err("a number"),
            Value::String(_) => Err("a string"),
            Value::Array(_) => Err("an array"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(value: Value) -> ExtractionResult {
        ExtractionResult::try_from(value).unwrap()
    }

    #[test]
    fn test_null_and_blank_fields_are_missing() {
        let r = result(json!({
            "target_company": null,
            "acquirer_company": "  ",
            "development_stage": "Phase 1"
        }));
        assert!(r.get(TARGET_COMPANY).is_none());
        assert!(r.text(ACQUIRER_COMPANY).is_none());
        assert_eq!(r.text(DEVELOPMENT_STAGE).as_deref(), Some("Phase 1"));
        assert!(r.text(ASSET_NAME).is_none());
    }

    #[test]
    fn test_numbers_render_as_text() {
        let r = result(json!({"asset_name": 101}));
        assert_eq!(r.text(ASSET_NAME).as_deref(), Some("101"));
    }

    #[test]
    fn test_non_object_rejected() {
        assert_eq!(ExtractionResult::try_from(json!([1, 2])), Err("an array"));
        assert_eq!(ExtractionResult::try_from(json!("{}")), Err("a string"));
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let r = result(json!({"deal_type": "licensing"}));
        assert_eq!(serde_json::to_string(&r).unwrap(), r#"{"deal_type":"licensing"}"#);
        assert_eq!(serde_json::to_string(&ExtractionResult::empty()).unwrap(), "{}");
    }
}
