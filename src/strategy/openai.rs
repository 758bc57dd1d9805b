//! OpenAI-backed strategy.
//!
//! Each operation is one chat completion. Transport and API errors are
//! returned as-is. A classification reply that is not Hot/Warm/Cold falls
//! back to the keyword rules for that lead.

use async_trait::async_trait;
use tracing::warn;

use super::offline::classify_interest;
use super::{DecisionStrategy, StrategyKind};
use crate::client::{CompletionClient, CompletionParams};
use crate::config::AgentConfig;
use crate::error::Result;
use crate::prompts::{classify_prompt, followup_prompt, summarize_prompt};
use crate::types::{Classification, Lead};

/// Sampling for the one-word classification.
const CLASSIFY_TEMPERATURE: f32 = 0.0;
const CLASSIFY_MAX_TOKENS: u32 = 6;

/// Sampling for follow-up drafts.
const FOLLOWUP_TEMPERATURE: f32 = 0.3;
const FOLLOWUP_MAX_TOKENS: u32 = 150;

/// Sampling for ticket summaries.
const SUMMARY_TEMPERATURE: f32 = 0.0;
const SUMMARY_MAX_TOKENS: u32 = 60;

/// First word of `reply`, first letter upper-cased and the rest lower-cased.
fn first_word_capitalized(reply: &str) -> Option<String> {
    let word = reply.split_whitespace().next()?;
    let mut chars = word.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect())
}

/// Map a classification reply onto a tier, if it names one.
pub fn parse_classification(reply: &str) -> Option<Classification> {
    first_word_capitalized(reply).and_then(|word| Classification::parse(&word))
}

/// Strategy that asks an OpenAI chat model.
pub struct OpenAIStrategy {
    client: CompletionClient,
}

impl OpenAIStrategy {
    /// Create the strategy with a client built from `config`.
    pub fn new(config: &AgentConfig) -> Result<Self> {
        Ok(Self {
            client: CompletionClient::new(config)?,
        })
    }
}

#[async_trait]
impl DecisionStrategy for OpenAIStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::OpenAI
    }

    async fn classify(&self, lead: &Lead) -> Result<Classification> {
        let params = CompletionParams::new(classify_prompt(lead))
            .temperature(CLASSIFY_TEMPERATURE)
            .max_tokens(CLASSIFY_MAX_TOKENS);
        let reply = self.client.complete(&params).await?;

        match parse_classification(&reply) {
            Some(category) => Ok(category),
            None => {
                let fallback = classify_interest(&lead.interest);
                warn!(
                    lead_id = %lead.id,
                    reply = %reply.trim(),
                    fallback = %fallback,
                    "Model returned no valid classification, using keyword rules"
                );
                Ok(fallback)
            }
        }
    }

    async fn draft_followup(&self, lead: &Lead) -> Result<String> {
        let params = CompletionParams::new(followup_prompt(lead))
            .temperature(FOLLOWUP_TEMPERATURE)
            .max_tokens(FOLLOWUP_MAX_TOKENS);
        Ok(self.client.complete(&params).await?.trim().to_string())
    }

    async fn summarize_ticket(&self, lead: &Lead) -> Result<String> {
        let params = CompletionParams::new(summarize_prompt(lead))
            .temperature(SUMMARY_TEMPERATURE)
            .max_tokens(SUMMARY_MAX_TOKENS);
        Ok(self.client.complete(&params).await?.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact_words() {
        assert_eq!(parse_classification("Hot"), Some(Classification::Hot));
        assert_eq!(parse_classification("Warm"), Some(Classification::Warm));
        assert_eq!(parse_classification("Cold"), Some(Classification::Cold));
    }

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        assert_eq!(parse_classification("  hot\n"), Some(Classification::Hot));
        assert_eq!(parse_classification("WARM lead"), Some(Classification::Warm));
        assert_eq!(parse_classification("cOLD"), Some(Classification::Cold));
    }

    #[test]
    fn test_parse_rejects_other_replies() {
        assert_eq!(parse_classification(""), None);
        assert_eq!(parse_classification("   "), None);
        assert_eq!(parse_classification("Hot."), None);
        assert_eq!(parse_classification("Lukewarm"), None);
        assert_eq!(parse_classification("The lead is Hot"), None);
    }
}
