#![allow(missing_docs)]

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("CSV not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid request body: {0}")]
    InvalidRequest(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("OpenAI API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("API returned empty response")]
    EmptyResponse,
}

impl AgentError {
    /// Whether the error is the caller's fault rather than the service's.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::InvalidRequest(_))
    }
}

pub type Result<T> = std::result::Result<T, AgentError>;
