//! Decision strategies.
//!
//! A strategy classifies a lead, drafts a follow-up and summarizes its
//! ticket. Two implementations exist:
//!
//! - [`RuleBasedStrategy`]: deterministic keyword rules, no network
//! - [`OpenAIStrategy`]: delegates each operation to a chat completion
//!
//! The implementation is chosen once at startup by [`build_strategy`].

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::config::AgentConfig;
use crate::error::Result;
use crate::types::{Classification, Lead};

pub mod offline;
pub mod openai;

pub use offline::RuleBasedStrategy;
pub use openai::OpenAIStrategy;

/// Which strategy is serving decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Keyword rules.
    Offline,
    /// OpenAI chat completions.
    #[serde(rename = "openai")]
    OpenAI,
}

impl StrategyKind {
    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Offline => "offline",
            Self::OpenAI => "openai",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify / follow-up / summarize capability.
///
/// Errors are returned to the caller untouched; isolating them per lead is
/// the orchestrator's job.
#[async_trait]
pub trait DecisionStrategy: Send + Sync {
    /// Which implementation this is.
    fn kind(&self) -> StrategyKind;

    /// Assign a priority tier.
    async fn classify(&self, lead: &Lead) -> Result<Classification>;

    /// Draft a follow-up message. Only called for Hot and Warm leads.
    async fn draft_followup(&self, lead: &Lead) -> Result<String>;

    /// Summarize the lead's ticket. Only called when the ticket is non-blank.
    async fn summarize_ticket(&self, lead: &Lead) -> Result<String>;
}

/// Build the strategy selected by `config`.
///
/// # Errors
///
/// Fails if the configuration is invalid or the HTTP client cannot be built.
pub fn build_strategy(config: &AgentConfig) -> Result<Arc<dyn DecisionStrategy>> {
    config.validate()?;

    let strategy: Arc<dyn DecisionStrategy> = if config.use_openai() {
        Arc::new(OpenAIStrategy::new(config)?)
    } else {
        Arc::new(RuleBasedStrategy::new())
    };

    info!(strategy = %strategy.kind(), "Decision strategy selected");
    Ok(strategy)
}
