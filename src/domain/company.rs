use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// LinkedIn is never resolved at scrape time; every record carries this marker.
pub const LINKEDIN_PLACEHOLDER: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub name: String,
    pub url: String,
    pub linkedin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl CompanyRecord {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            linkedin: LINKEDIN_PLACEHOLDER.to_string(),
            match_score: None,
            reasoning: None,
        }
    }

    /// Merge a scoring result into this record, replacing any earlier score.
    pub fn apply_score(&mut self, result: ScoringResult) {
        self.match_score = Some(result.match_score);
        self.reasoning = Some(result.reasoning);
    }

    pub fn is_scored(&self) -> bool {
        self.match_score.is_some()
    }

    /// Plain-text rendering handed to the language model.
    pub fn describe(&self) -> String {
        format!(
            "Name: {}\nWebsite: {}\nLinkedIn: {}",
            self.name, self.url, self.linkedin
        )
    }
}

/// Fit score for one company against a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringResult {
    #[serde(deserialize_with = "deserialize_score")]
    pub match_score: u8,
    #[serde(default)]
    pub reasoning: String,
}

impl ScoringResult {
    pub fn new(match_score: u8, reasoning: impl Into<String>) -> Self {
        Self {
            match_score: match_score.min(100),
            reasoning: reasoning.into(),
        }
    }

    /// Returned without any network call when no API key is configured.
    pub fn missing_key() -> Self {
        Self::new(0, "API Key missing")
    }

    /// Assigned at merge time to batch members the model did not answer for.
    pub fn ai_error() -> Self {
        Self::new(0, "AI Error")
    }

    pub fn failed(err: impl std::fmt::Display) -> Self {
        Self::new(0, format!("Error: {}", err))
    }
}

/// Round and clamp a raw model score into 0..=100.
pub fn clamp_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u8
}

// Models occasionally answer with 87.5, "87" or "87%" instead of an integer.
fn deserialize_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let raw = match &value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    raw.map(clamp_score)
        .ok_or_else(|| de::Error::custom(format!("invalid match_score: {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_has_placeholder_and_no_score() {
        let record = CompanyRecord::new("Acme", "https://example.com/acme");
        assert_eq!(record.linkedin, "N/A");
        assert!(record.match_score.is_none());
        assert!(record.reasoning.is_none());
        assert!(!record.is_scored());
    }

    #[test]
    fn test_apply_score() {
        let mut record = CompanyRecord::new("Acme", "https://example.com/acme");
        record.apply_score(ScoringResult::new(72, "Good overlap"));
        assert_eq!(record.match_score, Some(72));
        assert_eq!(record.reasoning.as_deref(), Some("Good overlap"));
    }

    #[test]
    fn test_unscored_record_omits_optional_fields() {
        let record = CompanyRecord::new("Acme", "https://example.com/acme");
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("match_score").is_none());
        assert!(json.get("reasoning").is_none());
        assert_eq!(json["linkedin"], "N/A");
    }

    #[test]
    fn test_sentinels() {
        assert_eq!(ScoringResult::missing_key(), ScoringResult::new(0, "API Key missing"));
        assert_eq!(ScoringResult::ai_error(), ScoringResult::new(0, "AI Error"));
        assert_eq!(ScoringResult::failed("boom").reasoning, "Error: boom");
    }

    #[test]
    fn test_score_parses_integer() {
        let r: ScoringResult =
            serde_json::from_str(r#"{"match_score": 85, "reasoning": "Strong fit"}"#).unwrap();
        assert_eq!(r, ScoringResult::new(85, "Strong fit"));
    }

    #[test]
    fn test_score_parses_float_and_string() {
        let r: ScoringResult = serde_json::from_str(r#"{"match_score": 66.6, "reasoning": ""}"#).unwrap();
        assert_eq!(r.match_score, 67);
        let r: ScoringResult = serde_json::from_str(r#"{"match_score": "40%"}"#).unwrap();
        assert_eq!(r.match_score, 40);
        assert_eq!(r.reasoning, "");
    }

    #[test]
    fn test_score_is_clamped() {
        let r: ScoringResult = serde_json::from_str(r#"{"match_score": 140, "reasoning": "x"}"#).unwrap();
        assert_eq!(r.match_score, 100);
        let r: ScoringResult = serde_json::from_str(r#"{"match_score": -3, "reasoning": "x"}"#).unwrap();
        assert_eq!(r.match_score, 0);
    }

    #[test]
    fn test_score_rejects_non_numeric() {
        let r = serde_json::from_str::<ScoringResult>(r#"{"match_score": "high", "reasoning": "x"}"#);
        assert!(r.is_err());
    }

    #[test]
    fn test_describe_mentions_name_and_url() {
        let text = CompanyRecord::new("Acme", "https://example.com/acme").describe();
        assert!(text.contains("Acme"));
        assert!(text.contains("https://example.com/acme"));
    }
}
