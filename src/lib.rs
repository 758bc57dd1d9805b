//! Spikra SmartAgent
//!
//! Reads customer leads from a CSV file, sorts each into a Hot/Warm/Cold
//! tier, drafts follow-ups for promising leads and summarizes support
//! tickets. Decisions come either from deterministic keyword rules or from
//! an OpenAI chat model, chosen once at startup.
//!
//! # Example
//!
//! ```rust,no_run
//! use spikra_smartagent::{build_strategy, AgentConfig, LeadReader, RunOrchestrator};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = AgentConfig::from_env()?;
//! let orchestrator = RunOrchestrator::new(build_strategy(&config)?);
//! let reader = LeadReader::open("data/sample_leads.csv")?;
//! let report = orchestrator.run(reader.leads()?).await;
//! println!("{} processed, {} errors", report.status.processed, report.status.errors);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod error;
pub mod leads;
pub mod orchestrator;
pub mod prompts;
pub mod server;
pub mod strategy;
pub mod types;

pub use client::{CompletionClient, CompletionParams};
pub use config::AgentConfig;
pub use error::{AgentError, Result};
pub use leads::LeadReader;
pub use orchestrator::RunOrchestrator;
pub use server::{build_router, AppState};
pub use strategy::{build_strategy, DecisionStrategy, OpenAIStrategy, RuleBasedStrategy, StrategyKind};
pub use types::*;
