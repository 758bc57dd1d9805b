//! OpenAI chat completions client.
//!
//! Async HTTP client for the completion calls the model-backed strategy makes.

use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Response,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AgentConfig;
use crate::error::{AgentError, Result};

/// Parameters for one completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionParams {
    /// User prompt.
    pub prompt: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

impl CompletionParams {
    /// Create new completion parameters with deterministic sampling.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: 0.0,
            max_tokens: 256,
        }
    }

    /// Set temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = temp;
        self
    }

    /// Set max tokens.
    pub fn max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = max;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<ChatCompletionChoice>,
}

/// OpenAI API client.
pub struct CompletionClient {
    client: Client,
    url: String,
    model: String,
}

impl CompletionClient {
    /// Create a new client from the service configuration.
    pub fn new(config: &AgentConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.api_key()))
                .map_err(|e| AgentError::Config(e.to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .build()?;

        Ok(Self {
            client,
            url: config.chat_completions_url(),
            model: config.model().to_string(),
        })
    }

    /// Model requested on every call.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Check response for errors.
    async fn check_response(&self, response: Response) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let message = serde_json::from_str::<serde_json::Value>(&message)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(String::from))
            .unwrap_or(message);

        Err(AgentError::Api { status, message })
    }

    /// Request a single completion and return its raw text.
    pub async fn complete(&self, params: &CompletionParams) -> Result<String> {
        debug!(
            model = %self.model,
            temperature = params.temperature,
            max_tokens = params.max_tokens,
            "Requesting completion"
        );

        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Some(params.prompt.clone()),
            }],
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        let response = self.client.post(&self.url).json(&body).send().await?;
        let response = self.check_response(response).await?;

        let completion: ChatCompletionResponse = response.json().await?;
        if let Some(model) = &completion.model {
            debug!(model = %model, "Completion received");
        }
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(AgentError::EmptyResponse)
    }
}
