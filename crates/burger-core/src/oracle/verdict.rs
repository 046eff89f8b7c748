//! Parsing of the judge's reply into a [`QualityJudgment`].

use serde::Deserialize;
use serde_json::Value;

use super::{JudgmentSource, OracleError, QualityJudgment};

/// Score assumed when the reply carries no `score` field.
const DEFAULT_SCORE: i64 = 5;
const DEFAULT_COMMENT: &str = "The judge did not leave a comment.";

#[derive(Deserialize)]
struct RawVerdict {
    #[serde(default)]
    score: Option<Value>,
    #[serde(default)]
    comment: Option<Value>,
}

/// Parses a judge reply of the form `{"score": 7, "comment": "..."}`.
///
/// Models like to wrap JSON in prose or code fences, so parsing starts at the first `{`
/// and stops at the end of that object. Numeric strings and fractional numbers are
/// accepted and truncated; anything else is a [`OracleError::MalformedResponse`].
/// A comment that is not a string is kept as its JSON text.
pub fn parse_verdict(raw: &str) -> Result<QualityJudgment, OracleError> {
    let Some(start) = raw.find('{') else {
        return Err(OracleError::MalformedResponse(format!(
            "no JSON object in reply: {}",
            truncate(raw)
        )));
    };

    let verdict: RawVerdict = serde_json::Deserializer::from_str(&raw[start..])
        .into_iter::<RawVerdict>()
        .next()
        .ok_or_else(|| OracleError::MalformedResponse("empty reply".to_string()))?
        .map_err(|err| OracleError::MalformedResponse(err.to_string()))?;

    let score = match verdict.score {
        None | Some(Value::Null) => DEFAULT_SCORE,
        Some(value) => score_from_value(&value)?,
    };
    let comment = verdict
        .comment
        .and_then(comment_from_value)
        .unwrap_or_else(|| DEFAULT_COMMENT.to_string());

    Ok(QualityJudgment::new(score, comment, JudgmentSource::Oracle))
}

fn comment_from_value(value: Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s,
        other => other.to_string(),
    };
    (!text.trim().is_empty()).then_some(text)
}

fn score_from_value(value: &Value) -> Result<i64, OracleError> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| OracleError::MalformedResponse(format!("unusable score: {value}")))
}

fn truncate(raw: &str) -> String {
    raw.chars().take(80).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_plain_object() {
        let judgment = parse_verdict(r#"{"score": 7, "comment": "Nice bun"}"#).unwrap();
        assert_eq!(judgment.score, 7);
        assert_eq!(judgment.comment, "Nice bun");
        assert_eq!(judgment.source, JudgmentSource::Oracle);
    }

    #[test]
    fn test_parses_fenced_reply() {
        let raw = "Here you go:\n```json\n{\"score\": \"9\", \"comment\": \"Great\"}\n```";
        assert_eq!(parse_verdict(raw).unwrap().score, 9);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let judgment = parse_verdict("{}").unwrap();
        assert_eq!(judgment.score, 5);
        assert_eq!(judgment.comment, DEFAULT_COMMENT);
    }

    #[test]
    fn test_out_of_range_scores_are_clamped() {
        assert_eq!(parse_verdict(r#"{"score": 15}"#).unwrap().score, 10);
        assert_eq!(parse_verdict(r#"{"score": -2}"#).unwrap().score, 0);
        assert_eq!(parse_verdict(r#"{"score": 6.8}"#).unwrap().score, 6);
    }

    #[test]
    fn test_structured_comment_keeps_score() {
        let raw = r#"{"score": 9, "comment": {"colour": "good", "shape": "clear"}}"#;
        let judgment = parse_verdict(raw).unwrap();
        assert_eq!(judgment.score, 9);
        assert!(judgment.comment.contains("\"colour\":\"good\""));
    }

    #[test]
    fn test_braces_after_object_are_ignored() {
        let raw = r#"{"score": 6, "comment": "Solid"} Hope that helps {:}"#;
        let judgment = parse_verdict(raw).unwrap();
        assert_eq!(judgment.score, 6);
        assert_eq!(judgment.comment, "Solid");
    }

    #[test]
    fn test_malformed_replies() {
        assert!(matches!(
            parse_verdict("The drawing looks like a bun. 8/10"),
            Err(OracleError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_verdict(r#"{"score": "great"}"#),
            Err(OracleError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_verdict("{score: 7"),
            Err(OracleError::MalformedResponse(_))
        ));
    }
}
