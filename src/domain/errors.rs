//! Error taxonomy for the domain layer.

/// Typed failures surfaced to the presentation layer.
///
/// The domain never swallows errors: validation failures report the first
/// offending field verbatim, and storage failures pass through opaquely as
/// [`LedgerError::Io`] without any automatic retry.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Malformed, out-of-range or missing input. Always recoverable.
    #[error("{0}")]
    Validation(String),

    /// A referenced service, customer or transaction does not exist.
    #[error("{0}")]
    NotFound(String),

    /// An operation was attempted against a record in the wrong state.
    #[error("{0}")]
    InvalidState(String),

    /// Persistence collaborator failure.
    #[error(transparent)]
    Io(#[from] anyhow::Error),
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        LedgerError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        LedgerError::NotFound(msg.into())
    }
}
