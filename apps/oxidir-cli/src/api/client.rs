//! HTTP client wrapper for the directory REST facade

use crate::config::{Config, ConfigPaths};
use crate::credentials::get_credential_store;
use crate::error::{CliError, CliResult};
use crate::models::ApiErrorBody;
use oxidir_engine::error::{EngineError, EngineResult};
use oxidir_engine::session::SessionContext;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::time::Duration;

const USER_AGENT: &str = concat!("oxidir/", env!("CARGO_PKG_VERSION"));

/// Client for the directory REST facade
///
/// Carries the process-wide [`SessionContext`]; every authenticated request
/// reads the bearer token from it at send time, so a cleared session takes
/// effect immediately for requests already queued behind it.
pub struct RestDirectory {
    http: Client,
    base_url: String,
    config: Config,
    session: SessionContext,
}

impl RestDirectory {
    /// Create a client from default config paths, installing stored
    /// credentials into a fresh session when they are still valid
    pub async fn from_defaults() -> CliResult<Self> {
        let paths = ConfigPaths::new()?;
        let config = Config::load(&paths)?;
        let session = SessionContext::new();

        let store = get_credential_store(&paths);
        if let Some(credentials) = store.load()? {
            if credentials.is_expired() {
                // Stale tokens are useless; drop them so the next failure
                // reads as "not logged in" rather than a server rejection
                store.delete()?;
            } else {
                session.install(credentials).await;
            }
        }

        Self::new(config, session)
    }

    /// Create a client from CLI settings
    pub fn new(config: Config, session: SessionContext) -> CliResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CliError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.server_url.trim_end_matches('/').to_string(),
            config,
            session,
        })
    }

    /// Get a reference to the config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The session this client reads its bearer token from
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Attach the session bearer token and send
    pub(crate) async fn send_authenticated(
        &self,
        request: RequestBuilder,
    ) -> EngineResult<Response> {
        let credentials = self
            .session
            .credentials()
            .await
            .ok_or(EngineError::NotAuthenticated)?;
        if credentials.is_expired() {
            return Err(EngineError::authentication("session token expired"));
        }

        request
            .bearer_auth(&credentials.access_token)
            .send()
            .await
            .map_err(transport_error)
    }

    /// Make an authenticated GET request
    pub(crate) async fn get_authenticated(&self, url: &str) -> EngineResult<Response> {
        self.send_authenticated(self.http.get(url)).await
    }

    /// Make an authenticated POST request with JSON body
    pub(crate) async fn post_json<T: serde::Serialize>(
        &self,
        url: &str,
        body: &T,
    ) -> EngineResult<Response> {
        self.send_authenticated(self.http.post(url).json(body)).await
    }

    /// Make an authenticated PATCH request with JSON body
    pub(crate) async fn patch_json<T: serde::Serialize>(
        &self,
        url: &str,
        body: &T,
    ) -> EngineResult<Response> {
        self.send_authenticated(self.http.patch(url).json(body)).await
    }

    /// Make an unauthenticated GET request
    pub(crate) async fn get_unauthenticated(&self, url: &str) -> EngineResult<Response> {
        self.http.get(url).send().await.map_err(transport_error)
    }

    /// Map a non-success response to an engine error, preserving the
    /// server-provided detail message when the body carries one
    pub(crate) async fn error_from_response(&self, response: Response) -> EngineError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|e| e.detail)
            .unwrap_or(body);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let message = if detail.is_empty() {
                    format!("request rejected with status {status}")
                } else {
                    detail
                };
                EngineError::authentication(message)
            }
            StatusCode::NOT_FOUND => {
                let identifier = if detail.is_empty() {
                    "resource".to_string()
                } else {
                    detail
                };
                EngineError::not_found(identifier)
            }
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                EngineError::validation(detail)
            }
            _ => EngineError::transport(format!("server returned {status}: {detail}")),
        }
    }
}

/// Map a reqwest failure to an engine transport error
pub(crate) fn transport_error(e: reqwest::Error) -> EngineError {
    if e.is_connect() {
        EngineError::transport(format!("could not connect to the directory service: {e}"))
    } else if e.is_timeout() {
        EngineError::transport("request timed out")
    } else {
        EngineError::transport(e.to_string())
    }
}

/// Decode a success body, treating a malformed payload as a transport fault
pub(crate) async fn decode_json<T: serde::de::DeserializeOwned>(
    response: Response,
) -> EngineResult<T> {
    response
        .json()
        .await
        .map_err(|e| EngineError::transport(format!("invalid response body: {e}")))
}
