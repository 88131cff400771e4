//! Extraction parser — the trust boundary between raw agent text and
//! structured JSON.
//!
//! Model endpoints return text, not guaranteed-valid JSON: replies arrive
//! wrapped in prose, fenced in markdown, quoted with single quotes, or cut
//! off mid-stream. `extract` recovers the payload through escalating
//! phases, first success wins:
//!
//! 1. Direct parse of the whole reply
//! 2. Markdown-fenced blocks, in order of appearance
//! 3. Balanced-delimiter spans from a string-aware scan
//! 4. One bounded normalization pass over the same candidates
//!
//! A candidate either parses cleanly end-to-end (strictly, or after the
//! single normalization pass) or is discarded; nothing partially parsed is
//! ever returned.

mod candidate;
mod normalize;

pub use candidate::{candidates, Candidate, Phase};
pub use normalize::normalize;

use serde_json::Value;
use thiserror::Error;

/// Extraction failure — no candidate parsed after all recovery phases.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// The reply holds nothing that parses as JSON, even after repair.
    #[error("no structured payload found in agent reply")]
    NoStructure,
}

/// Recover a JSON value from a raw agent reply.
///
/// Deterministic and side-effect-free; each phase is at most a linear
/// scan over the reply. Clean JSON passes through verbatim, so for any
/// valid JSON input this is equivalent to `serde_json::from_str`.
pub fn extract(raw: &str) -> Result<Value, ExtractError> {
    let cands = candidates(raw);

    // Phases 1-3: strict parse, confidence order.
    for cand in &cands {
        if let Ok(value) = serde_json::from_str(cand.text(raw)) {
            return Ok(value);
        }
    }

    // Phase 4: one normalization pass per candidate, same order.
    for cand in &cands {
        let repaired = normalize(cand.text(raw));
        if repaired != cand.text(raw) {
            if let Ok(value) = serde_json::from_str(&repaired) {
                return Ok(value);
            }
        }
    }

    tracing::debug!(reply_len = raw.len(), "no structured payload in agent reply");
    Err(ExtractError::NoStructure)
}

/// Unwrap the `{ "result": ... }` envelope convention.
///
/// Some agents wrap the payload, some return it bare; callers get the
/// payload either way. Applied once, never recursively.
pub fn payload(value: Value) -> Value {
    match value {
        Value::Object(mut map) => match map.remove("result") {
            Some(inner) => inner,
            None => Value::Object(map),
        },
        other => other,
    }
}

/// Extract and envelope-unwrap in one step.
pub fn extract_payload(raw: &str) -> Result<Value, ExtractError> {
    extract(raw).map(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // --- Scenario: clean JSON passes through verbatim ---

    #[test]
    fn clean_object_matches_direct_parse() {
        let raw = "{\"a\": 1, \"b\": [true, null]}";
        let direct: Value = serde_json::from_str(raw).unwrap();
        assert_eq!(extract(raw).unwrap(), direct);
    }

    #[test]
    fn clean_array_and_scalars_pass_through() {
        assert_eq!(extract("[1, 2, 3]").unwrap(), json!([1, 2, 3]));
        assert_eq!(extract("42").unwrap(), json!(42));
        assert_eq!(extract("\"hello\"").unwrap(), json!("hello"));
        assert_eq!(extract("null").unwrap(), Value::Null);
    }

    #[test]
    fn unicode_content_is_preserved() {
        let raw = "{\"note\": \"café — 12€\"}";
        assert_eq!(extract(raw).unwrap()["note"], "café — 12€");
    }

    // --- Scenario: fenced replies yield the fenced content ---

    #[test]
    fn fenced_block_with_prose_parses_fenced_content() {
        let raw = "Sure, here it is:\n```json\n{\"a\": 1}\n```\nAnything else?";
        assert_eq!(extract(raw).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn broken_first_fence_falls_through_to_second() {
        let raw = "```json\n{oops\n```\nand the fix:\n```json\n{\"a\": 2}\n```";
        assert_eq!(extract(raw).unwrap(), json!({"a": 2}));
    }

    // --- Scenario: prose-embedded structures are recovered exactly ---

    #[test]
    fn object_between_prose_is_recovered() {
        let raw = "The record you asked for {\"a\": {\"b\": 2}} — let me know!";
        assert_eq!(extract(raw).unwrap(), json!({"a": {"b": 2}}));
    }

    #[test]
    fn brace_inside_quoted_string_survives() {
        let raw = "see {\"note\": \"a {weird} string\"} above";
        assert_eq!(extract(raw).unwrap()["note"], "a {weird} string");
    }

    #[test]
    fn truncated_early_object_does_not_mask_later_one() {
        let raw = "draft: {\"a\": [1, 2 final: {\"b\": 3}";
        assert_eq!(extract(raw).unwrap(), json!({"b": 3}));
    }

    // --- Scenario: unrecoverable input is a definitive failure ---

    #[test]
    fn truncated_object_fails() {
        assert_eq!(
            extract("{\"a\": 1, \"b\": "),
            Err(ExtractError::NoStructure)
        );
    }

    #[test]
    fn garbage_fails() {
        assert_eq!(extract("{not valid json at all"), Err(ExtractError::NoStructure));
        assert_eq!(extract(""), Err(ExtractError::NoStructure));
        assert_eq!(extract("   "), Err(ExtractError::NoStructure));
        assert_eq!(extract("\u{0}\u{1}control"), Err(ExtractError::NoStructure));
    }

    // --- Scenario: lenient normalization rescues near-JSON ---

    #[test]
    fn single_quoted_reply_with_trailing_comma_is_repaired() {
        let raw = "{'summary': 'spent a lot', 'insights': [], 'recommendations': [], \
                   'statistics': {'total_spend': 120.5, 'top_category': 'Rent', \
                   'unusual_patterns': []},}";
        let canonical = json!({
            "summary": "spent a lot",
            "insights": [],
            "recommendations": [],
            "statistics": {
                "total_spend": 120.5,
                "top_category": "Rent",
                "unusual_patterns": []
            }
        });
        assert_eq!(extract(raw).unwrap(), canonical);
    }

    #[test]
    fn normalization_is_not_reached_when_a_strict_candidate_exists() {
        // The scan finds the strict object before the direct candidate is repaired.
        let raw = "prefix {\"a\": 1} suffix";
        assert_eq!(extract(raw).unwrap(), json!({"a": 1}));
    }

    // --- Scenario: envelope projection ---

    #[test]
    fn result_envelope_is_unwrapped() {
        let value = json!({"result": {"a": 1}, "status": "ok"});
        assert_eq!(payload(value), json!({"a": 1}));
    }

    #[test]
    fn bare_payload_passes_through() {
        assert_eq!(payload(json!({"a": 1})), json!({"a": 1}));
        assert_eq!(payload(json!([1, 2])), json!([1, 2]));
        assert_eq!(payload(json!("text")), json!("text"));
    }

    #[test]
    fn envelope_unwrap_is_not_recursive() {
        let value = json!({"result": {"result": 1}});
        assert_eq!(payload(value), json!({"result": 1}));
    }

    #[test]
    fn extract_payload_composes_both_steps() {
        let raw = "```json\n{\"result\": {\"a\": 1}}\n```";
        assert_eq!(extract_payload(raw).unwrap(), json!({"a": 1}));
    }

    // --- Scenario: determinism and round-trip stability ---

    #[test]
    fn identical_input_yields_identical_output() {
        let raw = "noise {\"a\": [1, {\"b\": 2}]} noise";
        assert_eq!(extract(raw).unwrap(), extract(raw).unwrap());
    }

    #[test]
    fn reserialized_extraction_extracts_to_the_same_value() {
        let raw = "Sure: {'a': 1, 'b': ['x'],} thanks";
        let value = extract(raw).unwrap();
        let round_tripped = extract(&value.to_string()).unwrap();
        assert_eq!(round_tripped, value);
    }
}
