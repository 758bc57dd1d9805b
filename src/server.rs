//! HTTP service.
//!
//! - `GET /`       - service status and active strategy
//! - `GET /health` - health check
//! - `POST /run`   - process a lead file

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::config::{AgentConfig, DEFAULT_CSV_PATH};
use crate::error::AgentError;
use crate::leads::LeadReader;
use crate::orchestrator::RunOrchestrator;
use crate::strategy::{build_strategy, DecisionStrategy, StrategyKind};

const SERVICE_MESSAGE: &str = "Spikra SmartAgent Prototype Running";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Body of `POST /run`.
#[derive(Debug, Clone, Deserialize)]
pub struct RunRequest {
    /// Lead file to process.
    #[serde(default = "default_csv_path")]
    pub csv_path: String,
}

fn default_csv_path() -> String {
    DEFAULT_CSV_PATH.to_string()
}

impl Default for RunRequest {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
        }
    }
}

#[derive(Debug, Serialize)]
struct InfoResponse {
    message: String,
    use_openai: bool,
    strategy: StrategyKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    version: String,
    endpoints: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    strategy: StrategyKind,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

// ============================================================================
// App State
// ============================================================================

/// Shared handler state. The strategy is fixed for the life of the process.
#[derive(Clone)]
pub struct AppState {
    config: Arc<AgentConfig>,
    orchestrator: RunOrchestrator,
}

impl AppState {
    /// Build state with the strategy `config` selects.
    pub fn new(config: AgentConfig) -> crate::error::Result<Self> {
        let strategy = build_strategy(&config)?;
        Ok(Self::with_strategy(config, strategy))
    }

    /// Build state around an existing strategy.
    pub fn with_strategy(config: AgentConfig, strategy: Arc<dyn DecisionStrategy>) -> Self {
        Self {
            config: Arc::new(config),
            orchestrator: RunOrchestrator::new(strategy),
        }
    }

    /// Service configuration.
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    fn strategy_kind(&self) -> StrategyKind {
        self.orchestrator.strategy().kind()
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn service_info(State(state): State<AppState>) -> Json<InfoResponse> {
    let mut endpoints = HashMap::new();
    endpoints.insert(
        "POST /run".to_string(),
        "Process a lead CSV and return per-lead results".to_string(),
    );
    endpoints.insert("GET /health".to_string(), "Health check endpoint".to_string());
    endpoints.insert("GET /".to_string(), "This info endpoint".to_string());

    let strategy = state.strategy_kind();
    Json(InfoResponse {
        message: SERVICE_MESSAGE.to_string(),
        use_openai: strategy == StrategyKind::OpenAI,
        strategy,
        model: (strategy == StrategyKind::OpenAI).then(|| state.config.model().to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints,
    })
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        strategy: state.strategy_kind(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

async fn run_agent(State(state): State<AppState>, body: Bytes) -> Response {
    let request = match parse_run_request(&body) {
        Ok(request) => request,
        Err(e) => return error_response(e),
    };
    info!(csv_path = %request.csv_path, "Run requested");

    let leads = match LeadReader::open(&request.csv_path).and_then(|reader| reader.leads()) {
        Ok(leads) => leads,
        Err(e) => return error_response(e),
    };

    let report = state.orchestrator.run(leads).await;
    (StatusCode::OK, Json(report)).into_response()
}

/// An empty body means "use the defaults"; anything else must be a valid
/// [`RunRequest`].
fn parse_run_request(body: &[u8]) -> Result<RunRequest, AgentError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RunRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| AgentError::InvalidRequest(e.to_string()))
}

fn error_response(err: AgentError) -> Response {
    let status = if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        error!("Run failed: {}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

/// Router with all routes and permissive CORS.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health))
        .route("/run", post(run_agent))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_request_defaults_path() {
        let request: RunRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.csv_path, DEFAULT_CSV_PATH);
        assert_eq!(RunRequest::default().csv_path, DEFAULT_CSV_PATH);
    }

    #[test]
    fn test_parse_run_request() {
        assert_eq!(parse_run_request(b"").unwrap().csv_path, DEFAULT_CSV_PATH);
        assert_eq!(parse_run_request(b" \n").unwrap().csv_path, DEFAULT_CSV_PATH);
        assert_eq!(
            parse_run_request(br#"{"csv_path": "leads.csv"}"#).unwrap().csv_path,
            "leads.csv"
        );
        for bad in [&br#"{"csv_path": 42}"#[..], br#"{"csv_path": "x.csv""#, b"not json"] {
            let err = parse_run_request(bad).unwrap_err();
            assert!(matches!(err, AgentError::InvalidRequest(_)));
            assert!(err.is_client_error());
        }
    }

    #[test]
    fn test_not_found_maps_to_bad_request() {
        let response = error_response(AgentError::NotFound("missing.csv".into()));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_other_errors_map_to_server_error() {
        let response = error_response(AgentError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        )));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_state_reports_strategy() {
        let state = AppState::new(AgentConfig::new()).unwrap();
        assert_eq!(state.strategy_kind(), StrategyKind::Offline);
        assert!(!state.config().use_openai());
    }
}
