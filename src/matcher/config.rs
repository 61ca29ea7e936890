use serde::{Deserialize, Serialize};

/// How companies are submitted to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    /// One request per company
    Single,
    /// One request per chunk of `batch_size` companies
    Batch,
}

/// Configuration for AI profile matching
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Chat model used for scoring (default: gpt-4o)
    pub model: String,

    /// Companies per request in batch mode (default: 20)
    pub batch_size: usize,

    /// Alternative API endpoint, e.g. a proxy or a compatible server
    pub api_base: Option<String>,

    /// Default scoring mode (default: single)
    pub mode: ScoringMode,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            batch_size: 20,
            api_base: None,
            mode: ScoringMode::Single,
        }
    }
}
