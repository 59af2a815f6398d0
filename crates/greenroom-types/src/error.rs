use thiserror::Error;

/// Errors from repository operations (used by trait definitions in
/// greenroom-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from the outbound messaging client.
#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("messaging API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unreadable messaging API response: {0}")]
    InvalidResponse(String),
}
