//! Directory-wide wire models

use serde::{Deserialize, Serialize};

/// Container DNs from GET /api/tree
#[derive(Debug, Serialize, Deserialize)]
pub struct TreeResponse {
    pub containers: Vec<String>,
}

/// Response from GET /api/health
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Generic acknowledgement body returned by mutating endpoints
#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error body produced by the facade on failure
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub detail: String,
}
