//! Keyword-rule strategy. Works without network access.

use async_trait::async_trait;

use super::{DecisionStrategy, StrategyKind};
use crate::error::Result;
use crate::types::{Classification, Lead};

/// Tickets longer than this many characters are truncated.
pub const SUMMARY_MAX_CHARS: usize = 120;

/// Appended to truncated summaries.
pub const ELLIPSIS: &str = "...";

/// Tier from the interest field: "high" → Hot, "medium"/"med" → Warm,
/// anything else → Cold. Case-insensitive substring match.
pub fn classify_interest(interest: &str) -> Classification {
    let interest = interest.to_lowercase();
    if interest.contains("high") {
        Classification::Hot
    } else if interest.contains("med") {
        // "medium" contains "med".
        Classification::Warm
    } else {
        Classification::Cold
    }
}

/// Canned follow-up naming the contact and company.
pub fn followup_message(lead: &Lead) -> String {
    format!(
        "Hi {}, thanks for your interest in {}. I'd be happy to schedule a quick call to discuss next steps.",
        lead.name, lead.company
    )
}

/// Trimmed ticket, cut to [`SUMMARY_MAX_CHARS`] characters plus [`ELLIPSIS`].
pub fn truncate_ticket(ticket: &str) -> String {
    let ticket = ticket.trim();
    match ticket.char_indices().nth(SUMMARY_MAX_CHARS) {
        Some((cut, _)) => format!("{}{}", &ticket[..cut], ELLIPSIS),
        None => ticket.to_string(),
    }
}

/// Deterministic rule-based strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedStrategy;

impl RuleBasedStrategy {
    /// Create the strategy.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DecisionStrategy for RuleBasedStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Offline
    }

    async fn classify(&self, lead: &Lead) -> Result<Classification> {
        Ok(classify_interest(&lead.interest))
    }

    async fn draft_followup(&self, lead: &Lead) -> Result<String> {
        Ok(followup_message(lead))
    }

    async fn summarize_ticket(&self, lead: &Lead) -> Result<String> {
        Ok(truncate_ticket(&lead.ticket))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_interest() {
        let cases = [
            ("high value", Classification::Hot),
            ("HIGH", Classification::Hot),
            ("very High priority", Classification::Hot),
            ("medium", Classification::Warm),
            ("Med", Classification::Warm),
            ("immediate", Classification::Warm),
            ("low", Classification::Cold),
            ("", Classification::Cold),
            ("curious", Classification::Cold),
        ];
        for (interest, expected) in cases {
            assert_eq!(classify_interest(interest), expected, "interest {interest:?}");
        }
    }

    #[test]
    fn test_high_wins_over_medium() {
        assert_eq!(classify_interest("medium-high"), Classification::Hot);
    }

    #[test]
    fn test_followup_message() {
        let lead = Lead {
            name: "Ana".to_string(),
            company: "Acme".to_string(),
            ..Default::default()
        };
        assert_eq!(
            followup_message(&lead),
            "Hi Ana, thanks for your interest in Acme. I'd be happy to schedule a quick call to discuss next steps."
        );
    }

    #[test]
    fn test_truncate_short_ticket_is_unchanged() {
        assert_eq!(truncate_ticket("  Login broken  "), "Login broken");
        assert_eq!(truncate_ticket(""), "");
        assert_eq!(truncate_ticket("   "), "");
    }

    #[test]
    fn test_truncate_exactly_at_limit() {
        let ticket = "x".repeat(SUMMARY_MAX_CHARS);
        assert_eq!(truncate_ticket(&ticket), ticket);
    }

    #[test]
    fn test_truncate_long_ticket() {
        let ticket: String = (0..200).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let summary = truncate_ticket(&ticket);
        assert_eq!(summary.chars().count(), SUMMARY_MAX_CHARS + ELLIPSIS.len());
        assert_eq!(summary, format!("{}...", &ticket[..120]));
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let ticket = "é".repeat(150);
        let summary = truncate_ticket(&ticket);
        assert_eq!(summary, format!("{}...", "é".repeat(120)));
    }

    #[test]
    fn test_summary_is_bounded_and_prefix() {
        for len in [0, 1, 119, 120, 121, 500] {
            let ticket = "t".repeat(len);
            let summary = truncate_ticket(&ticket);
            assert!(summary.chars().count() <= SUMMARY_MAX_CHARS + 3);
            if !summary.ends_with(ELLIPSIS) {
                assert!(ticket.starts_with(&summary));
            }
        }
    }

    #[tokio::test]
    async fn test_strategy_operations() {
        let strategy = RuleBasedStrategy::new();
        let lead = Lead {
            name: "Ana".to_string(),
            company: "Acme".to_string(),
            interest: "medium".to_string(),
            ticket: "Need an invoice copy".to_string(),
            ..Default::default()
        };

        assert_eq!(strategy.kind(), StrategyKind::Offline);
        assert_eq!(strategy.classify(&lead).await.unwrap(), Classification::Warm);
        assert!(strategy.draft_followup(&lead).await.unwrap().contains("Acme"));
        assert_eq!(
            strategy.summarize_ticket(&lead).await.unwrap(),
            "Need an invoice copy"
        );
    }
}
