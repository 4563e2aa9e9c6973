//! Authentication API methods

use crate::api::client::{decode_json, transport_error, RestDirectory};
use crate::models::{LoginRequest, LoginResponse, MeResponse};
use chrono::{Duration, Utc};
use oxidir_engine::error::EngineResult;
use oxidir_engine::session::Credentials;

impl RestDirectory {
    /// Exchange a username and password for a bearer token
    pub async fn login(&self, username: &str, password: &str) -> EngineResult<Credentials> {
        let url = self.url("/api/login");
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let response = self
            .http()
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        if response.status().is_success() {
            let token: LoginResponse = decode_json(response).await?;
            let mut credentials = Credentials::bearer(token.access_token);
            if let Some(secs) = token.expires_in {
                credentials =
                    credentials.with_expiry(Utc::now() + Duration::seconds(secs as i64));
            }
            Ok(credentials)
        } else {
            Err(self.error_from_response(response).await)
        }
    }

    /// Identify the account behind the session token
    pub async fn me(&self) -> EngineResult<MeResponse> {
        let url = self.url("/api/me");
        let response = self.get_authenticated(&url).await?;

        if response.status().is_success() {
            decode_json(response).await
        } else {
            Err(self.error_from_response(response).await)
        }
    }
}
