//! Process-wide session context.
//!
//! One [`SessionContext`] exists per authenticated session. It is a cheaply
//! cloneable handle injected into the façade implementation and the idle
//! guard — never read from ambient global state — so the engine stays
//! testable with fake credentials. Only the idle guard and the explicit
//! logout path may clear an installed credential.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Clock-skew buffer applied when judging credential expiry.
const EXPIRY_BUFFER_SECS: i64 = 30;

/// Bearer credential for the directory façade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,
    pub token_type: String,
    /// Wall-clock expiry, when the façade communicates one.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credentials {
    /// Bearer credential without a known expiry.
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Credentials {
            access_token: access_token.into(),
            token_type: "bearer".to_string(),
            expires_at: None,
        }
    }

    /// Attach a wall-clock expiry.
    #[must_use]
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Whether the credential is expired or about to expire.
    ///
    /// An unknown expiry is treated as live; the façade's rejection is the
    /// authority in that case.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(at) => Utc::now() + Duration::seconds(EXPIRY_BUFFER_SECS) >= at,
            None => false,
        }
    }
}

/// Process-wide session state with an explicit install/clear lifecycle.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    inner: Arc<RwLock<Option<Credentials>>>,
}

impl SessionContext {
    /// Fresh context with no credential installed.
    pub fn new() -> Self {
        SessionContext::default()
    }

    /// Install a credential, replacing any previous one.
    pub async fn install(&self, credentials: Credentials) {
        *self.inner.write().await = Some(credentials);
    }

    /// Remove the installed credential.
    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }

    /// Snapshot of the installed credential, if any.
    pub async fn credentials(&self) -> Option<Credentials> {
        self.inner.read().await.clone()
    }

    /// Whether a credential is currently installed.
    pub async fn is_active(&self) -> bool {
        self.inner.read().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn install_and_clear_lifecycle() {
        let session = SessionContext::new();
        assert!(!session.is_active().await);
        assert!(session.credentials().await.is_none());

        session.install(Credentials::bearer("tok-1")).await;
        assert!(session.is_active().await);
        assert_eq!(
            session.credentials().await.map(|c| c.access_token),
            Some("tok-1".to_string())
        );

        session.clear().await;
        assert!(!session.is_active().await);
    }

    #[tokio::test]
    async fn clones_share_the_same_state() {
        let session = SessionContext::new();
        let handle = session.clone();

        session.install(Credentials::bearer("tok-2")).await;
        assert!(handle.is_active().await);

        handle.clear().await;
        assert!(!session.is_active().await);
    }

    #[test]
    fn expiry_applies_a_skew_buffer() {
        let live = Credentials::bearer("tok").with_expiry(Utc::now() + Duration::hours(1));
        assert!(!live.is_expired());

        let closing = Credentials::bearer("tok").with_expiry(Utc::now() + Duration::seconds(10));
        assert!(closing.is_expired());

        let unknown = Credentials::bearer("tok");
        assert!(!unknown.is_expired());
    }

    // Stored credential files parse with these exact field names.
    #[test]
    fn credential_json_shape_is_stable() {
        let json = serde_json::to_value(Credentials::bearer("tok-3")).unwrap();
        assert_eq!(json["access_token"], "tok-3");
        assert_eq!(json["token_type"], "bearer");
        assert!(json["expires_at"].is_null());

        let parsed: Credentials =
            serde_json::from_str(r#"{"access_token":"tok-4","token_type":"bearer"}"#).unwrap();
        assert!(parsed.expires_at.is_none());
    }
}
