//! API request and response types.

use serde::{Deserialize, Serialize};

/// Request to run a research query.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    /// The user's question
    pub query: String,

    /// Optional model override (uses default if not specified)
    pub model: Option<String>,
}

/// Structured research result returned to the caller.
///
/// This is also the schema the model's final text is validated against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchResponse {
    /// Short name of the research topic
    pub topic: String,

    /// The research summary
    pub summary: String,

    /// URLs or citations backing the summary, in the model's order
    pub sources: Vec<String>,

    /// Names of the tools the model invoked, in the model's order
    pub tools_used: Vec<String>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Human-readable status message
    pub message: String,
}
