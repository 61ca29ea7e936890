//! Scoring companies against a free-text profile with a chat model.
//!
//! ```text
//! CompanyRecord + profile → CompanyMatcher → ScoringResult → CompanyRecord::apply_score
//! ```
//!
//! Matchers never fail: a missing key or a failed call becomes a sentinel
//! score, and [`score_companies`] guarantees every record ends up scored.

mod config;
mod openai;

pub use config::{MatcherConfig, ScoringMode};
pub use openai::OpenAiMatcher;

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{CompanyRecord, ScoringResult};

#[async_trait]
pub trait CompanyMatcher: Send + Sync {
    /// Score one company
    async fn score(&self, company: &CompanyRecord, profile: &str) -> ScoringResult;

    /// Score a chunk of companies, keyed by position within `companies` ("0", "1", ...).
    ///
    /// Missing keys mean the model gave no usable answer for that company.
    async fn score_batch(
        &self,
        companies: &[CompanyRecord],
        profile: &str,
    ) -> HashMap<String, ScoringResult>;
}

/// Attach a score to every company.
///
/// `progress` is called with (scored, total) after each request.
pub async fn score_companies<M>(
    matcher: &M,
    companies: &mut [CompanyRecord],
    profile: &str,
    mode: ScoringMode,
    batch_size: usize,
    mut progress: impl FnMut(usize, usize),
) where
    M: CompanyMatcher + ?Sized,
{
    let total = companies.len();

    match mode {
        ScoringMode::Single => {
            for (idx, company) in companies.iter_mut().enumerate() {
                let result = matcher.score(company, profile).await;
                company.apply_score(result);
                progress(idx + 1, total);
            }
        }
        ScoringMode::Batch => {
            let mut done = 0;
            for chunk in companies.chunks_mut(batch_size.max(1)) {
                let scores = matcher.score_batch(chunk, profile).await;
                debug!("Batch of {} returned {} scores", chunk.len(), scores.len());
                merge_batch(chunk, scores);
                done += chunk.len();
                progress(done, total);
            }
        }
    }
}

/// Apply batch results by position; unanswered companies get the "AI Error" sentinel
pub fn merge_batch(chunk: &mut [CompanyRecord], mut scores: HashMap<String, ScoringResult>) {
    for (idx, company) in chunk.iter_mut().enumerate() {
        let result = scores
            .remove(&idx.to_string())
            .unwrap_or_else(ScoringResult::ai_error);
        company.apply_score(result);
    }
}
