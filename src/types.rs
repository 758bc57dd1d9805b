//! Lead, classification and run result types.
//!
//! These are the shapes returned by `POST /run`.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize, Serializer};

// ============================================================================
// Lead
// ============================================================================

/// One customer record from the input file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Lead {
    /// Lead identifier (free-form).
    pub id: String,
    /// Contact name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Company name.
    pub company: String,
    /// Free-text interest level.
    pub interest: String,
    /// Free-text support ticket.
    pub ticket: String,
}

impl Lead {
    /// Whether the lead carries a ticket worth summarizing.
    pub fn has_ticket(&self) -> bool {
        !self.ticket.trim().is_empty()
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Priority tier of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    /// Ready to buy.
    Hot,
    /// Interested, needs nurturing.
    Warm,
    /// Low interest.
    Cold,
}

impl Classification {
    /// All tiers, hottest first.
    pub const ALL: [Classification; 3] = [Self::Hot, Self::Warm, Self::Cold];

    /// Canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hot => "Hot",
            Self::Warm => "Warm",
            Self::Cold => "Cold",
        }
    }

    /// Parse a canonical name. Anything but `Hot`, `Warm` or `Cold` is rejected.
    pub fn parse(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == text)
    }

    /// Hot and Warm leads get a follow-up message.
    pub fn needs_followup(&self) -> bool {
        matches!(self, Self::Hot | Self::Warm)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Run results
// ============================================================================

/// Seconds with millisecond precision, as reported over the wire.
pub fn round_secs(duration: Duration) -> f64 {
    (duration.as_secs_f64() * 1000.0).round() / 1000.0
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_secs(*duration))
}

/// Outcome of processing one lead. Exactly one variant is ever populated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LeadOutcome {
    /// Every strategy call for the lead returned.
    Succeeded {
        /// Assigned tier.
        category: Classification,
        /// Follow-up draft, empty for Cold leads.
        followup: String,
        /// Ticket summary, empty when the lead had no ticket.
        ticket_summary: String,
        /// Time spent on this lead.
        #[serde(rename = "latency_sec", serialize_with = "serialize_secs")]
        latency: Duration,
    },
    /// A strategy call failed.
    Failed {
        /// Error message.
        error: String,
        /// Error with its cause chain.
        trace: String,
    },
}

/// Per-lead entry of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadResult {
    /// The input record.
    pub lead: Lead,
    /// What happened to it.
    #[serde(flatten)]
    pub outcome: LeadOutcome,
}

impl LeadResult {
    /// Whether the lead was processed without error.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, LeadOutcome::Succeeded { .. })
    }
}

/// Aggregate counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// Leads processed successfully.
    pub processed: usize,
    /// Leads that failed.
    pub errors: usize,
    /// Mean latency over successful leads, zero when there are none.
    #[serde(rename = "avg_latency_sec", serialize_with = "serialize_secs")]
    pub avg_latency: Duration,
    /// Wall-clock time of the whole run.
    #[serde(rename = "total_time_sec", serialize_with = "serialize_secs")]
    pub total_time: Duration,
}

/// Response body of `POST /run`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    /// Aggregate counters.
    pub status: RunSummary,
    /// Per-lead results in input order.
    pub results: Vec<LeadResult>,
}
