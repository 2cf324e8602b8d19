//! Router, shared state, and request handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info_span, Instrument};
use uuid::Uuid;

use crate::agent::Agent;

use super::types::{HealthResponse, QueryRequest, ResearchResponse};

/// Read-only state shared across requests.
#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<Agent>,
}

/// Build the router with request tracing and CORS.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/research", post(research))
        .layer(TraceLayer::new_for_http())
        // Development-mode policy: any origin, with credentials.
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Liveness probe. Never touches the providers.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "research agent is running".to_string(),
    })
}

/// Run a research query through the agent.
///
/// Agent, provider, and parse failures all surface as a bare 500; the
/// details go to the log, not the caller.
async fn research(
    State(state): State<AppState>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<ResearchResponse>, StatusCode> {
    let request_id = Uuid::new_v4();
    let span = info_span!("research", %request_id);

    async move {
        let response = state
            .agent
            .run_query(&req.query, req.model.as_deref())
            .await
            .map_err(|e| {
                error!("research query failed: {:#}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            })?;

        Ok(Json(response))
    }
    .instrument(span)
    .await
}
