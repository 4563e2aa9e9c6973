//! Engine error types.
//!
//! Error definitions matching the failure taxonomy the engine exposes to its
//! callers: transport, validation, authentication, and missing-object
//! failures. A discarded stale response is *not* an error and never appears
//! here; it is reported as [`crate::model::RefreshOutcome::Stale`].

use thiserror::Error;

/// Error that can occur during directory engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The façade was unreachable or returned a non-success status that
    /// carries no validation meaning (5xx, connection refused, timeout).
    #[error("transport error: {message}")]
    Transport { message: String },

    /// The server rejected the request as invalid. The server-provided
    /// detail is preserved verbatim so the user can correct and resubmit.
    #[error("validation failed: {detail}")]
    Validation { detail: String },

    /// The façade rejected the attached credential, or authentication with
    /// the supplied username/password failed.
    #[error("authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// No credential is installed in the session context.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The target object does not exist.
    #[error("not found: {identifier}")]
    NotFound { identifier: String },
}

impl EngineError {
    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        EngineError::Transport {
            message: message.into(),
        }
    }

    /// Create a validation error carrying the server-provided detail.
    pub fn validation(detail: impl Into<String>) -> Self {
        EngineError::Validation {
            detail: detail.into(),
        }
    }

    /// Create an authentication failure.
    pub fn authentication(message: impl Into<String>) -> Self {
        EngineError::AuthenticationFailed {
            message: message.into(),
        }
    }

    /// Create a not-found error.
    pub fn not_found(identifier: impl Into<String>) -> Self {
        EngineError::NotFound {
            identifier: identifier.into(),
        }
    }

    /// Check if this failure must tear the session down.
    ///
    /// Authentication failures follow the same teardown path as idle expiry;
    /// every other failure is recovered at the command boundary and leaves
    /// the session alive.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            EngineError::AuthenticationFailed { .. } | EngineError::NotAuthenticated
        )
    }

    /// Get an error code for classification.
    pub fn error_code(&self) -> &'static str {
        match self {
            EngineError::Transport { .. } => "TRANSPORT",
            EngineError::Validation { .. } => "VALIDATION",
            EngineError::AuthenticationFailed { .. } => "AUTH_FAILED",
            EngineError::NotAuthenticated => "NOT_AUTHENTICATED",
            EngineError::NotFound { .. } => "NOT_FOUND",
        }
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_tear_down_the_session() {
        assert!(EngineError::authentication("rejected").is_auth_failure());
        assert!(EngineError::NotAuthenticated.is_auth_failure());
    }

    #[test]
    fn recoverable_failures_keep_the_session() {
        let recoverable = vec![
            EngineError::transport("connection refused"),
            EngineError::validation("entryAlreadyExists"),
            EngineError::not_found("uid=ghost"),
        ];
        for err in recoverable {
            assert!(
                !err.is_auth_failure(),
                "expected {} to be recoverable",
                err.error_code()
            );
        }
    }

    #[test]
    fn display_preserves_server_detail() {
        let err = EngineError::validation("posix group requires a gidNumber");
        assert_eq!(
            err.to_string(),
            "validation failed: posix group requires a gidNumber"
        );

        let err = EngineError::not_found("trino_admins");
        assert_eq!(err.to_string(), "not found: trino_admins");
    }
}
