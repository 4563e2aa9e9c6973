//! Authentication wire models

use serde::{Deserialize, Serialize};

/// Login request body
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Token response from POST /api/login
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until the token expires, when the server reports it
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Response from GET /api/me
#[derive(Debug, Deserialize)]
pub struct MeResponse {
    pub username: String,
}
