//! Prompt templates for the OpenAI-backed strategy.

use crate::types::Lead;

/// Ask for a one-word Hot/Warm/Cold verdict.
pub fn classify_prompt(lead: &Lead) -> String {
    format!(
        "You are a CRM assistant. Based on these fields, classify the lead into exactly one word: Hot, Warm, or Cold.\n\
         Name: {}\n\
         Company: {}\n\
         Interest: {}\n\
         Ticket: {}\n\
         \n\
         Output only one word: Hot or Warm or Cold.\n",
        lead.name, lead.company, lead.interest, lead.ticket
    )
}

/// Ask for a short personalized follow-up email.
pub fn followup_prompt(lead: &Lead) -> String {
    format!(
        "Write a short (2-3 sentence) personalized follow-up email for {} at {} based on interest level: {}. \
         Keep it friendly and mention the company's name once.",
        lead.name, lead.company, lead.interest
    )
}

/// Ask for a one-sentence ticket summary.
pub fn summarize_prompt(lead: &Lead) -> String {
    format!(
        "Summarize the customer ticket in one short sentence.\nTicket: {}",
        lead.ticket
    )
}
