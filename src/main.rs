//! Spikra SmartAgent server.
//!
//! - `USE_OPENAI=true` with `OPENAI_API_KEY`: decisions from OpenAI
//! - otherwise: deterministic keyword rules, no API keys required

use std::net::SocketAddr;

use anyhow::{Context, Result};
use spikra_smartagent::{build_router, AgentConfig, AppState};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("spikra_smartagent=info".parse()?)
                .add_directive("server=info".parse()?),
        )
        .init();

    let config = AgentConfig::from_env().inspect_err(|e| error!("{}", e))?;
    let port = config.port();
    let state = AppState::new(config).context("failed to build decision strategy")?;

    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("Spikra SmartAgent listening on http://{}", addr);
    info!("  GET  /       - Service status");
    info!("  GET  /health - Health check");
    info!("  POST /run    - Process a lead CSV");

    axum::serve(listener, app).await?;

    Ok(())
}
