use std::io;

/// Errors from storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested object was not found.
    #[error("object not found: {container}/{key}")]
    NotFound { container: String, key: String },

    /// The caller is not allowed to touch the container.
    #[error("access denied to {container}: {reason}")]
    AccessDenied { container: String, reason: String },

    /// The container or key cannot be stored by this backend.
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// The backend is temporarily unreachable.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The backend asked the caller to slow down.
    #[error("request throttled: {0}")]
    Throttled(String),

    /// The request did not complete in time.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// I/O error from the underlying storage.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl StoreError {
    /// Whether the failure is transient and the same request may succeed later.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unavailable(_) | Self::Throttled(_) | Self::Timeout(_) => true,
            Self::Io(err) => matches!(
                err.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock
            ),
            Self::NotFound { .. } | Self::AccessDenied { .. } | Self::InvalidKey { .. } => false,
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
