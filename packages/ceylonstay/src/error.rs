//! Typed errors for the listings core.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can match
//! on the failure class: auth and policy failures are surfaced immediately,
//! transient failures only after the upload retry budget is spent, and
//! validation failures never reach the network at all.

use thiserror::Error;

/// Result type alias for store and command operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Failures surfaced by the listing store and the operator commands.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No session could be established (anonymous sign-in rejected)
    #[error("authentication required: {0}")]
    AuthRequired(String),

    /// Backend policy rejected the operation
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Record or photo does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// A transient failure survived the whole retry budget
    #[error("transient backend failure, gave up after {attempts} retries")]
    Transient {
        attempts: u32,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Client-side input rejection, raised before any network call
    #[error("invalid listing: {0}")]
    Validation(#[from] ValidationError),

    /// Anything else, wrapped with a generic message
    #[error("backend error")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Input problems the operator can fix inline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("at least one photo is required")]
    NoPhotos,

    #[error("price must be greater than zero")]
    ZeroPrice,

    #[error("photo order must name every photo exactly once")]
    IncompletePhotoOrder,

    #[error("unknown photo id: {id}")]
    UnknownPhoto { id: String },
}
