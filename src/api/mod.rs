//! HTTP API for the research agent.
//!
//! Two routes: a liveness probe at `/` and the research endpoint at
//! `POST /research`. The agent is built once from the configuration and
//! shared read-only across requests through the router state.

pub mod routes;
pub mod types;

use anyhow::Context;
use tracing::info;

use crate::agent::Agent;
use crate::config::Config;

use self::routes::{build_router, AppState};

/// Build the agent from configuration and serve the API.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let agent = std::sync::Arc::new(Agent::new(config));
    let app = build_router(AppState { agent });

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Research agent listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
