use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::content::ContentHashNaming;
use crate::error::NamingError;
use crate::random::RandomNaming;

/// Derives an object name for a payload.
///
/// Implementations must be deterministic if they want identical payloads to
/// map onto the same object; nothing else is required of them. The trait is
/// object-safe so strategies can be held as `Arc<dyn NamingStrategy>`.
pub trait NamingStrategy: Send + Sync {
    /// Produce the object name for `payload`.
    fn name_for(&self, payload: &[u8]) -> Result<String, NamingError>;
}

impl<F> NamingStrategy for F
where
    F: Fn(&[u8]) -> Result<String, NamingError> + Send + Sync,
{
    fn name_for(&self, payload: &[u8]) -> Result<String, NamingError> {
        self(payload)
    }
}

/// The built-in strategies, selectable from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamingKind {
    /// Hex digest of the payload.
    #[default]
    ContentHash,
    /// Random identifier per write.
    Random,
}

impl NamingKind {
    /// Instantiate the strategy this kind names.
    pub fn strategy(self) -> Arc<dyn NamingStrategy> {
        match self {
            Self::ContentHash => Arc::new(ContentHashNaming::new()),
            Self::Random => Arc::new(RandomNaming::new()),
        }
    }
}

impl std::str::FromStr for NamingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "content-hash" | "content" | "hash" => Ok(Self::ContentHash),
            "random" | "uuid" => Ok(Self::Random),
            other => Err(format!("unknown naming strategy: {other}")),
        }
    }
}
