use std::time::Duration;

use thiserror::Error;

/// Classification of one failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt<E> {
    /// Transient failure; the same request may succeed after a wait.
    Retryable(E),
    /// Definitive failure; retrying cannot help.
    Permanent(E),
}

impl<E> Attempt<E> {
    /// Classify `err` using a backend's retryability verdict.
    pub fn classify(err: E, retryable: bool) -> Self {
        if retryable {
            Self::Retryable(err)
        } else {
            Self::Permanent(err)
        }
    }

    /// Returns `true` for [`Attempt::Retryable`].
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Retryable(_))
    }

    /// The wrapped error.
    pub fn into_inner(self) -> E {
        match self {
            Self::Retryable(err) | Self::Permanent(err) => err,
        }
    }
}

/// Why a transfer failed. The last observed error is always preserved.
#[derive(Debug, Error)]
pub enum TransferError<E> {
    /// A failure classified as permanent stopped the transfer.
    #[error("permanent failure on attempt {attempts}: {source}")]
    Permanent {
        attempts: u32,
        #[source]
        source: E,
    },

    /// The backoff budget ran out while failures were still retryable.
    #[error("retries exhausted after {attempts} attempts in {elapsed:?}: {source}")]
    Exhausted {
        attempts: u32,
        elapsed: Duration,
        #[source]
        source: E,
    },
}

impl<E> TransferError<E> {
    /// Number of attempts made, the failing one included.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Permanent { attempts, .. } | Self::Exhausted { attempts, .. } => *attempts,
        }
    }

    /// Returns `true` if the backoff budget was spent.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }

    /// The last observed error.
    pub fn cause(&self) -> &E {
        match self {
            Self::Permanent { source, .. } | Self::Exhausted { source, .. } => source,
        }
    }

    /// Unwrap the last observed error, unchanged.
    pub fn into_source(self) -> E {
        match self {
            Self::Permanent { source, .. } | Self::Exhausted { source, .. } => source,
        }
    }
}

/// Invalid retry configuration.
#[derive(Debug, Error, PartialEq)]
#[error("invalid retry configuration: {0}")]
pub struct ConfigError(pub String);
