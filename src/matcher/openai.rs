use std::collections::HashMap;

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::app::{DirscoutError, Result};
use crate::domain::{CompanyRecord, ScoringResult};
use crate::matcher::{CompanyMatcher, MatcherConfig};

const SYSTEM_PROMPT: &str = "You are a helpful assistant that outputs JSON.";

/// Matcher backed by an OpenAI-compatible chat completion endpoint
pub struct OpenAiMatcher {
    client: Option<Client<OpenAIConfig>>,
    model: String,
}

impl OpenAiMatcher {
    /// Build a matcher; a missing or blank key leaves it in sentinel-only mode
    pub fn new(api_key: Option<&str>, config: &MatcherConfig) -> Self {
        let client = api_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(|key| {
                let mut openai_config = OpenAIConfig::new().with_api_key(key);
                if let Some(ref base) = config.api_base {
                    openai_config = openai_config.with_api_base(base);
                }
                Client::with_config(openai_config)
            });

        Self {
            client,
            model: config.model.clone(),
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.client.is_some()
    }

    async fn complete(&self, client: &Client<OpenAIConfig>, prompt: String) -> Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(SYSTEM_PROMPT)
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt)
                    .build()?
                    .into(),
            ])
            .response_format(ResponseFormat::JsonObject)
            .build()?;

        let response = client.chat().create(request).await?;
        debug!("Completion {} with {} choices", response.id, response.choices.len());

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| DirscoutError::Ai("No content in completion response".to_string()))
    }

    async fn try_score(
        &self,
        client: &Client<OpenAIConfig>,
        company: &CompanyRecord,
        profile: &str,
    ) -> Result<ScoringResult> {
        let content = self.complete(client, single_prompt(company, profile)).await?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn try_score_batch(
        &self,
        client: &Client<OpenAIConfig>,
        companies: &[CompanyRecord],
        profile: &str,
    ) -> Result<HashMap<String, ScoringResult>> {
        let content = self.complete(client, batch_prompt(companies, profile)).await?;
        parse_batch(&content)
    }
}

#[async_trait]
impl CompanyMatcher for OpenAiMatcher {
    async fn score(&self, company: &CompanyRecord, profile: &str) -> ScoringResult {
        let Some(ref client) = self.client else {
            return ScoringResult::missing_key();
        };

        match self.try_score(client, company, profile).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Scoring {} failed: {}", company.name, e);
                ScoringResult::failed(e)
            }
        }
    }

    async fn score_batch(
        &self,
        companies: &[CompanyRecord],
        profile: &str,
    ) -> HashMap<String, ScoringResult> {
        let Some(ref client) = self.client else {
            return HashMap::new();
        };

        match self.try_score_batch(client, companies, profile).await {
            Ok(scores) => scores,
            Err(e) => {
                error!("Batch scoring of {} companies failed: {}", companies.len(), e);
                HashMap::new()
            }
        }
    }
}

fn single_prompt(company: &CompanyRecord, profile: &str) -> String {
    format!(
        r#"You are a career matching assistant.
Compare the following User Profile with the Company Information.

User Profile:
{profile}

Company Information:
{company}

Provide a JSON response with:
1. "match_score": A number between 0 and 100 representing the fit.
2. "reasoning": A concise explanation (max 2 sentences) of why this is a good or bad match.

Return ONLY JSON."#,
        profile = profile,
        company = company.describe()
    )
}

fn batch_prompt(companies: &[CompanyRecord], profile: &str) -> String {
    let listing = companies
        .iter()
        .enumerate()
        .map(|(idx, c)| format!("{}. {} ({})", idx, c.name, c.url))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a career matching assistant.
Compare the following User Profile with each of the numbered companies.

User Profile:
{profile}

Companies:
{listing}

Provide a JSON object whose keys are the company numbers as strings ("0", "1", ...).
Each value must be an object with:
1. "match_score": A number between 0 and 100 representing the fit.
2. "reasoning": A concise explanation (max 2 sentences) of why this is a good or bad match.

Return ONLY JSON."#
    )
}

/// Parse an index-keyed batch answer, dropping entries that are not valid scores
fn parse_batch(content: &str) -> Result<HashMap<String, ScoringResult>> {
    let raw: HashMap<String, serde_json::Value> = serde_json::from_str(content)?;

    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| match serde_json::from_value(value) {
            Ok(result) => Some((key.trim().to_string(), result)),
            Err(e) => {
                debug!("Ignoring batch entry {}: {}", key, e);
                None
            }
        })
        .collect())
}
