// src/validator.rs
// Turns raw model output into exactly one RatingResult, success flag attached.
// Pure: no logging, no counters. The orchestrator owns those.

use serde_json::Value;

/// Substituted whenever a usable explanation could not be extracted.
pub const SENTINEL_EXPLANATION: &str = "Explanation not available";

/// Rating recorded when the reply was unusable altogether.
pub const SENTINEL_RATING: i64 = 0;

pub const RATING_MIN: i64 = -100;
pub const RATING_MAX: i64 = 100;

/// One rated statement. Never mutated after creation; one per statement in
/// every finished run, even when every attempt failed.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingResult {
    pub statement: String,
    pub rating: i64,
    pub explanation: String,
}

impl RatingResult {
    pub fn sentinel(statement: &str) -> Self {
        Self {
            statement: statement.to_string(),
            rating: SENTINEL_RATING,
            explanation: SENTINEL_EXPLANATION.to_string(),
        }
    }

    /// Pipe-delimited output row. Fields are sanitized before they get here,
    /// so the delimiter never appears inside a field.
    pub fn to_line(&self) -> String {
        format!("{}|{}|{}", self.statement, self.rating, self.explanation)
    }
}

/// Evaluates one raw model reply against the expected
/// `{"rating": <n>, "explanation": <text>}` contract.
///
/// Returns the result plus whether the attempt counts as successful. The
/// attempt is successful iff the final explanation differs from the
/// sentinel. An absent or out-of-range rating is treated like a parse
/// failure: sentinel values all round.
pub fn evaluate_reply(statement: &str, raw: &str) -> (RatingResult, bool) {
    let parsed = match extract_json_object(raw)
        .and_then(|text| serde_json::from_str::<Value>(&text).ok())
    {
        Some(value) => value,
        None => return (RatingResult::sentinel(statement), false),
    };

    let rating = match parsed.get("rating").and_then(Value::as_i64) {
        Some(r) if (RATING_MIN..=RATING_MAX).contains(&r) => r,
        _ => return (RatingResult::sentinel(statement), false),
    };

    let explanation = match parsed.get("explanation").and_then(Value::as_str) {
        Some(text) => sanitize_explanation(text),
        None => SENTINEL_EXPLANATION.to_string(),
    };

    let success = explanation != SENTINEL_EXPLANATION;
    (
        RatingResult {
            statement: statement.to_string(),
            rating,
            explanation,
        },
        success,
    )
}

/// Trims the explanation and strips newline, carriage-return and pipe
/// characters. The pipe is the output field delimiter and must never appear
/// inside a field.
pub fn sanitize_explanation(raw: &str) -> String {
    raw.trim()
        .replace('\n', "")
        .replace('\r', "")
        .replace('|', "")
}

/// Models often wrap the JSON object in code fences or lead-in prose.
/// Isolate the outermost brace pair before handing it to serde.
fn extract_json_object(text: &str) -> Option<String> {
    let cleaned = text.replace("```json", "").replace("```", "");
    let start = cleaned.find('{')?;
    let end = cleaned.rfind('}')?;
    if start < end {
        Some(cleaned[start..=end].to_string())
    } else {
        None
    }
}
