//! Typed agent records and shape validation.
//!
//! Raw extraction is shape-agnostic; this layer projects the recovered
//! JSON into the two records the ledger consumes. "Nothing parsed" and
//! "parsed but wrong shape" stay distinct failure kinds so call sites can
//! tell a silent model from a confused one, even when both degrade to the
//! same fallback.

use crate::extract::{extract_payload, ExtractError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Failure kinds for typed record extraction.
#[derive(Debug, Error)]
pub enum RecordError {
    /// No JSON structure recovered from the reply at all.
    #[error(transparent)]
    Extraction(#[from] ExtractError),
    /// JSON recovered, but it does not carry the expected record fields.
    #[error("agent payload does not match the expected record shape: {0}")]
    Shape(#[from] serde_json::Error),
}

/// Category suggestion for a transaction saved without one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySuggestion {
    pub suggested_category: String,
    /// Model-reported confidence. Range checking is a caller concern.
    pub confidence_score: f64,
    /// Runner-up categories, best first. Agents may omit an empty list.
    #[serde(default)]
    pub alternative_categories: Vec<String>,
    #[serde(default)]
    pub reasoning: String,
}

/// Spending summary over a reporting period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub summary: String,
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    pub statistics: SummaryStatistics,
}

/// Aggregate figures attached to a financial summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub total_spend: f64,
    pub top_category: String,
    #[serde(default)]
    pub unusual_patterns: Vec<String>,
}

/// Project an extracted payload into a typed record.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, RecordError> {
    Ok(serde_json::from_value(value)?)
}

/// Extract, envelope-unwrap, and project a raw reply in one step.
pub fn extract_record<T: DeserializeOwned>(raw: &str) -> Result<T, RecordError> {
    let value = extract_payload(raw)?;
    decode(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // --- Scenario: a complete suggestion record decodes ---

    #[test]
    fn category_suggestion_decodes() {
        let value = json!({
            "suggested_category": "Groceries",
            "confidence_score": 0.92,
            "alternative_categories": ["Dining Out"],
            "reasoning": "matches grocery keywords"
        });
        let record: CategorySuggestion = decode(value).unwrap();
        assert_eq!(record.suggested_category, "Groceries");
        assert_eq!(record.confidence_score, 0.92);
        assert_eq!(record.alternative_categories, vec!["Dining Out"]);
    }

    #[test]
    fn omitted_list_fields_default_to_empty() {
        let value = json!({
            "suggested_category": "Rent",
            "confidence_score": 1.0
        });
        let record: CategorySuggestion = decode(value).unwrap();
        assert!(record.alternative_categories.is_empty());
        assert!(record.reasoning.is_empty());
    }

    // --- Scenario: a wrong-shape payload is a distinct failure kind ---

    #[test]
    fn missing_required_field_is_shape_mismatch() {
        let value = json!({"suggested_category": "Rent"});
        let err = decode::<CategorySuggestion>(value).unwrap_err();
        assert!(matches!(err, RecordError::Shape(_)));
    }

    #[test]
    fn structureless_reply_is_extraction_failure() {
        let err = extract_record::<CategorySuggestion>("no json here").unwrap_err();
        assert!(matches!(err, RecordError::Extraction(ExtractError::NoStructure)));
    }

    // --- Scenario: the summary record, statistics included ---

    #[test]
    fn financial_summary_decodes_with_statistics() {
        let value = json!({
            "summary": "spent a lot",
            "insights": ["rent dominates"],
            "recommendations": ["cook at home"],
            "statistics": {
                "total_spend": 120.5,
                "top_category": "Rent",
                "unusual_patterns": []
            }
        });
        let record: FinancialSummary = decode(value).unwrap();
        assert_eq!(record.statistics.total_spend, 120.5);
        assert_eq!(record.statistics.top_category, "Rent");
    }

    #[test]
    fn missing_statistics_is_shape_mismatch() {
        let value = json!({"summary": "spent a lot"});
        let err = decode::<FinancialSummary>(value).unwrap_err();
        assert!(matches!(err, RecordError::Shape(_)));
    }

    // --- Scenario: end-to-end from a wrapped, fenced reply ---

    #[test]
    fn fenced_enveloped_reply_yields_the_record() {
        let raw = "Sure! Here is the result:\n```json\n{\"result\": {\"suggested_category\": \"Groceries\", \"confidence_score\": 0.92, \"alternative_categories\": [\"Dining Out\"], \"reasoning\": \"matches grocery keywords\"}}\n```\nLet me know if you need anything else.";
        let record: CategorySuggestion = extract_record(raw).unwrap();
        assert_eq!(record.suggested_category, "Groceries");
        assert_eq!(record.confidence_score, 0.92);
        assert_eq!(record.alternative_categories, vec!["Dining Out"]);
        assert_eq!(record.reasoning, "matches grocery keywords");
    }
}
