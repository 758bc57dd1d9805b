//! Run orchestration.
//!
//! Leads are processed one at a time, in input order. A failure in any
//! strategy call is recorded against that lead and the run moves on.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::{AgentError, Result};
use crate::strategy::DecisionStrategy;
use crate::types::{Classification, Lead, LeadOutcome, LeadResult, RunReport, RunSummary};

/// Drives a [`DecisionStrategy`] over a sequence of leads.
#[derive(Clone)]
pub struct RunOrchestrator {
    strategy: Arc<dyn DecisionStrategy>,
}

struct Decision {
    category: Classification,
    followup: String,
    ticket_summary: String,
}

impl RunOrchestrator {
    /// Create an orchestrator for `strategy`.
    pub fn new(strategy: Arc<dyn DecisionStrategy>) -> Self {
        Self { strategy }
    }

    /// Strategy in use.
    pub fn strategy(&self) -> &Arc<dyn DecisionStrategy> {
        &self.strategy
    }

    async fn decide(&self, lead: &Lead) -> Result<Decision> {
        let category = self.strategy.classify(lead).await?;

        let followup = if category.needs_followup() {
            self.strategy.draft_followup(lead).await?
        } else {
            String::new()
        };

        let ticket_summary = if lead.has_ticket() {
            self.strategy.summarize_ticket(lead).await?
        } else {
            String::new()
        };

        Ok(Decision {
            category,
            followup,
            ticket_summary,
        })
    }

    /// Process one lead. Never fails: errors become [`LeadOutcome::Failed`].
    pub async fn process_lead(&self, lead: Lead) -> LeadResult {
        let started = Instant::now();
        let outcome = match self.decide(&lead).await {
            Ok(decision) => LeadOutcome::Succeeded {
                category: decision.category,
                followup: decision.followup,
                ticket_summary: decision.ticket_summary,
                latency: started.elapsed(),
            },
            Err(err) => failed(err),
        };

        match &outcome {
            LeadOutcome::Succeeded {
                category, latency, ..
            } => debug!(lead_id = %lead.id, %category, ?latency, "Lead processed"),
            LeadOutcome::Failed { error, .. } => {
                warn!(lead_id = %lead.id, error = %error, "Lead failed")
            }
        }

        LeadResult { lead, outcome }
    }

    /// Process every lead and summarize the run.
    ///
    /// Unreadable records count as failed leads with empty fields.
    pub async fn run<I>(&self, leads: I) -> RunReport
    where
        I: IntoIterator<Item = Result<Lead>>,
    {
        let started = Instant::now();
        info!(strategy = %self.strategy.kind(), "Run started");

        let mut results = Vec::new();
        for lead in leads {
            let result = match lead {
                Ok(lead) => self.process_lead(lead).await,
                Err(err) => {
                    warn!(error = %err, "Unreadable lead record");
                    LeadResult {
                        lead: Lead::default(),
                        outcome: failed(err),
                    }
                }
            };
            results.push(result);
        }

        let status = summarize(&results, started.elapsed());
        info!(
            processed = status.processed,
            errors = status.errors,
            total_time = ?status.total_time,
            "Run finished"
        );

        RunReport { status, results }
    }
}

fn failed(err: AgentError) -> LeadOutcome {
    let error = err.to_string();
    let trace = format!("{:?}", anyhow::Error::new(err));
    LeadOutcome::Failed { error, trace }
}

/// Aggregate counters over `results`.
pub fn summarize(results: &[LeadResult], total_time: Duration) -> RunSummary {
    let mut processed = 0usize;
    let mut errors = 0usize;
    let mut total_latency = Duration::ZERO;

    for result in results {
        match &result.outcome {
            LeadOutcome::Succeeded { latency, .. } => {
                processed += 1;
                total_latency += *latency;
            }
            LeadOutcome::Failed { .. } => errors += 1,
        }
    }

    let avg_latency = if processed > 0 {
        u64::try_from(total_latency.as_nanos() / processed as u128)
            .map(Duration::from_nanos)
            .unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    };

    RunSummary {
        processed,
        errors,
        avg_latency,
        total_time,
    }
}
