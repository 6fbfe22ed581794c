//! API request and response types.

use serde::{Deserialize, Serialize};

use crate::extraction::TaskCandidate;

/// Request to extract tasks from a transcript.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractTasksRequest {
    /// Raw meeting transcript
    #[serde(default)]
    pub transcript: Option<String>,
}

/// Successful extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractTasksResponse {
    /// Recovered candidates, in model order, unvalidated
    pub tasks: Vec<TaskCandidate>,
}

/// Error body for every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,

    /// Present (and empty) for upstream and parse failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<TaskCandidate>>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,

    /// Whether an API key for the upstream model is configured
    pub upstream_configured: bool,
}
