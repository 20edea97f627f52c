//! Parsing of the backend's structured answer.
//!
//! The expected payload is `{"matches": [{"activityId", "score", "reasons"}]}`.
//! Parsing is lenient about individual entries and strict about the payload
//! being JSON at all.

use catalog::ActivityId;
use serde_json::Value;
use tracing::warn;

use crate::LlmClientError;

/// One entry of the backend's answer, before validation against the candidates
#[derive(Debug, Clone, PartialEq)]
pub struct RankedMatch {
    pub activity_id: ActivityId,
    /// Raw score as returned, not yet clamped
    pub score: f64,
    pub reasons: Vec<String>,
}

/// Remove a surrounding markdown code fence, if any
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parse the backend's text into ranked matches.
///
/// # Returns
/// * `Ok(vec![])` - empty text, or JSON without a `matches` array
/// * `Ok(matches)` - every entry with a usable id and score
/// * `Err(InvalidResponse)` - the text is not JSON
pub fn parse_matches(text: &str) -> Result<Vec<RankedMatch>, LlmClientError> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let payload: Value =
        serde_json::from_str(body).map_err(|e| LlmClientError::InvalidResponse(e.to_string()))?;

    let Some(entries) = payload.get("matches").and_then(Value::as_array) else {
        warn!("Ranking response has no matches array");
        return Ok(Vec::new());
    };

    let matches = entries
        .iter()
        .filter_map(|entry| {
            let parsed = parse_entry(entry);
            if parsed.is_none() {
                warn!("Skipping unusable ranking entry: {}", entry);
            }
            parsed
        })
        .collect();

    Ok(matches)
}

fn parse_entry(entry: &Value) -> Option<RankedMatch> {
    let activity_id = as_activity_id(entry.get("activityId")?)?;
    let score = as_number(entry.get("score")?)?;
    let reasons = entry
        .get("reasons")
        .and_then(Value::as_array)
        .map(|reasons| {
            reasons
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Some(RankedMatch {
        activity_id,
        score,
        reasons,
    })
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

fn as_activity_id(value: &Value) -> Option<ActivityId> {
    let n = as_number(value)?;
    if n < 0.0 || n.fract() != 0.0 || n > ActivityId::MAX as f64 {
        return None;
    }
    Some(n as ActivityId)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed() {
        let text = r#"{"matches": [
            {"activityId": 3, "score": 88, "reasons": ["Fits your interests", "Close to Lima"]},
            {"activityId": 5, "score": 40}
        ]}"#;

        let matches = parse_matches(text).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].activity_id, 3);
        assert_eq!(matches[0].score, 88.0);
        assert_eq!(matches[0].reasons.len(), 2);
        assert_eq!(matches[1].activity_id, 5);
        assert!(matches[1].reasons.is_empty());
    }

    #[test]
    fn test_empty_text_is_soft_empty() {
        assert!(parse_matches("").unwrap().is_empty());
        assert!(parse_matches("   \n").unwrap().is_empty());
    }

    #[test]
    fn test_missing_matches_is_soft_empty() {
        assert!(parse_matches(r#"{"results": []}"#).unwrap().is_empty());
        assert!(parse_matches(r#"{"matches": "none"}"#).unwrap().is_empty());
        assert!(parse_matches(r#"{"matches": []}"#).unwrap().is_empty());
        assert!(parse_matches("[1, 2]").unwrap().is_empty());
    }

    #[test]
    fn test_not_json_is_error() {
        let result = parse_matches("I think activity 3 is the best fit.");
        assert!(matches!(result, Err(LlmClientError::InvalidResponse(_))));
    }

    #[test]
    fn test_code_fence_is_stripped() {
        let text = "```json\n{\"matches\": [{\"activityId\": 1, \"score\": 70}]}\n```";
        let matches = parse_matches(text).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].activity_id, 1);

        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("{}"), "{}");
    }

    #[test]
    fn test_lenient_entries() {
        let text = r#"{"matches": [
            {"activityId": "4", "score": "72.5", "reasons": ["ok", 3, null]},
            {"activityId": 6},
            {"score": 90},
            {"activityId": -1, "score": 50},
            {"activityId": 2.5, "score": 50},
            {"activityId": 9, "score": null},
            "garbage"
        ]}"#;

        let matches = parse_matches(text).unwrap();
        assert_eq!(
            matches,
            vec![RankedMatch {
                activity_id: 4,
                score: 72.5,
                reasons: vec!["ok".to_string()],
            }]
        );
    }
}
