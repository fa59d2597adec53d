//! Error types for the Firebase client.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can match
//! on the failure class. Raw backend payloads are logged at debug level and
//! never surfaced in the error message itself.

use reqwest::StatusCode;
use thiserror::Error;

/// Result type for Firebase client operations.
pub type Result<T> = std::result::Result<T, FirebaseError>;

/// Firebase client errors.
#[derive(Debug, Error)]
pub enum FirebaseError {
    /// Configuration error (missing env vars, malformed project settings)
    #[error("configuration error: {0}")]
    Config(String),

    /// Anonymous sign-in was rejected or no session could be established
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// Backend security rules rejected the operation
    #[error("permission denied for {resource}")]
    PermissionDenied { resource: String },

    /// Document or storage object does not exist
    #[error("not found: {resource}")]
    NotFound { resource: String },

    /// Transport-level failure (connect, timeout, TLS)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A transient failure survived the whole retry budget
    #[error("gave up after {attempts} retries")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<FirebaseError>,
    },

    /// Any other backend response, wrapped rather than passed through raw
    #[error("unexpected backend response (status {status}) for {resource}")]
    Api { status: u16, resource: String },

    /// Response body did not match the expected shape
    #[error("parse error: {0}")]
    Parse(String),
}

impl FirebaseError {
    /// Transient failures are worth retrying; auth and policy failures are not.
    pub fn is_transient(&self) -> bool {
        match self {
            FirebaseError::Network(_) => true,
            FirebaseError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Map a non-success HTTP status onto the error taxonomy.
///
/// `body` is only logged, so unknown backend error codes surface as a
/// generic message instead of leaking raw detail to callers.
pub(crate) fn status_error(status: StatusCode, resource: &str, body: &str) -> FirebaseError {
    tracing::debug!(status = status.as_u16(), resource, body, "backend returned an error");
    match status {
        StatusCode::UNAUTHORIZED => {
            FirebaseError::AuthFailed("credentials missing or expired".to_string())
        }
        StatusCode::FORBIDDEN => FirebaseError::PermissionDenied {
            resource: resource.to_string(),
        },
        StatusCode::NOT_FOUND => FirebaseError::NotFound {
            resource: resource.to_string(),
        },
        _ => FirebaseError::Api {
            status: status.as_u16(),
            resource: resource.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = status_error(StatusCode::FORBIDDEN, "objects/a.jpg", "{}");
        assert!(matches!(err, FirebaseError::PermissionDenied { .. }));

        let err = status_error(StatusCode::NOT_FOUND, "documents/x", "{}");
        assert!(matches!(err, FirebaseError::NotFound { .. }));

        let err = status_error(StatusCode::UNAUTHORIZED, "objects/a.jpg", "{}");
        assert!(matches!(err, FirebaseError::AuthFailed(_)));
    }

    #[test]
    fn test_unknown_status_is_wrapped_generically() {
        let err = status_error(StatusCode::IM_A_TEAPOT, "documents/x", "raw backend detail");
        let message = err.to_string();
        match err {
            FirebaseError::Api { status, .. } => {
                assert_eq!(status, 418);
                assert!(!message.contains("raw backend detail"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_transience_classification() {
        assert!(FirebaseError::Api {
            status: 503,
            resource: "x".into()
        }
        .is_transient());
        assert!(FirebaseError::Api {
            status: 429,
            resource: "x".into()
        }
        .is_transient());
        assert!(!FirebaseError::Api {
            status: 400,
            resource: "x".into()
        }
        .is_transient());
        assert!(!FirebaseError::PermissionDenied { resource: "x".into() }.is_transient());
        assert!(!FirebaseError::AuthFailed("nope".into()).is_transient());
    }
}
