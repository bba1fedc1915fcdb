//! Error types shared across the Simplex crates.

/// Errors surfaced by the server infrastructure.
///
/// Handler-level failures never reach this type; they are absorbed by the
/// dispatch layer and answered with a fixed 500 response.
#[derive(Debug, thiserror::Error)]
pub enum SimplexError {
    /// Configuration value was missing or could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Socket-level I/O failure (bind, listen, accept).
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error with context.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Convenience result type for Simplex operations.
pub type SimplexResult<T> = Result<T, SimplexError>;
