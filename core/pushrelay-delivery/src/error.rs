//! Error types for the delivery engine.

use thiserror::Error;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Result type for provider calls.
pub type DeliveryResult<T> = Result<T, DeliveryError>;

/// Result type for orchestrator operations.
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Errors raised while parsing identities and selectors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("identity must not be empty")]
    Empty,
}

/// Errors raised by an address registry backend.
///
/// The in-memory registry never fails; durable stores surface their
/// failures through this type.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry backend failed: {0}")]
    Backend(String),
}

/// Errors raised while submitting a chunk to the push provider.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider rejected batch with status {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("expected {expected} tickets from provider but got {actual}")]
    TicketMismatch { expected: usize, actual: usize },

    #[error("batch of {size} messages exceeds provider limit of {limit}")]
    BatchTooLarge { size: usize, limit: usize },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// Errors returned to callers of the orchestrator.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Required request fields are missing or empty.
    #[error("{0}")]
    InvalidInput(String),

    /// No registered, valid push address matched the selector.
    #[error("No valid recipients found")]
    NoRecipients,

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl NotifyError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            NotifyError::InvalidInput(_) => 400,
            NotifyError::NoRecipients => 404,
            NotifyError::Registry(_) => 500,
        }
    }

    /// Returns true if the caller caused the error.
    pub fn is_client_error(&self) -> bool {
        matches!(self, NotifyError::InvalidInput(_) | NotifyError::NoRecipients)
    }
}
