use std::fmt;
use std::io;
use std::time::Duration;

use inflight_naming::NamingError;
use inflight_types::TypeError;
use thiserror::Error;

/// The storage operation a failure belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Put,
    Get,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Put => f.write_str("put"),
            Self::Get => f.write_str("get"),
        }
    }
}

/// Errors from facade operations, generic over the backend's error type.
///
/// Only [`InflightError::Exhausted`] ever followed a retry; every other
/// variant was raised on the attempt that produced it.
#[derive(Debug, Error)]
pub enum InflightError<E> {
    /// The naming strategy failed. The backend was never contacted.
    #[error("naming failed: {0}")]
    Naming(#[from] NamingError),

    /// The name or configured path does not form a usable reference.
    #[error("invalid reference: {0}")]
    InvalidReference(#[from] TypeError),

    /// The backend reported a non-transient failure.
    #[error("{op} {container}/{key} failed permanently on attempt {attempts}: {source}")]
    Permanent {
        op: Operation,
        container: String,
        key: String,
        attempts: u32,
        #[source]
        source: E,
    },

    /// Transient failures outlasted the retry budget.
    #[error("{op} {container}/{key} gave up after {attempts} attempts in {elapsed:?}: {source}")]
    Exhausted {
        op: Operation,
        container: String,
        key: String,
        attempts: u32,
        elapsed: Duration,
        #[source]
        source: E,
    },

    /// The request succeeded but its body could not be drained.
    #[error("reading body of {container}/{key} failed on attempt {attempts}: {source}")]
    BodyRead {
        container: String,
        key: String,
        attempts: u32,
        #[source]
        source: io::Error,
    },
}

impl<E> InflightError<E> {
    /// The backend error behind a transport failure, if this is one.
    pub fn backend_error(&self) -> Option<&E> {
        match self {
            Self::Permanent { source, .. } | Self::Exhausted { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Attempts made against the backend before giving up.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Permanent { attempts, .. }
            | Self::Exhausted { attempts, .. }
            | Self::BodyRead { attempts, .. } => *attempts,
            Self::Naming(_) | Self::InvalidReference(_) => 0,
        }
    }

    /// Returns `true` if the retry budget was spent.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }
}

/// Result alias for facade operations.
pub type InflightResult<T, E> = Result<T, InflightError<E>>;
