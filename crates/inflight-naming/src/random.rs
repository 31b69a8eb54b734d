use rand::rngs::OsRng;
use rand::RngCore;
use uuid::{Builder, Uuid};

use crate::error::NamingError;
use crate::strategy::NamingStrategy;

type EntropySource = Box<dyn Fn(&mut [u8]) -> Result<(), rand::Error> + Send + Sync>;

/// Names payloads with a fresh random 128-bit identifier.
///
/// The identifier is rendered as a hyphenated lowercase UUID. Two writes of
/// the same bytes produce two distinct objects. Entropy comes from the
/// operating system unless another source is injected.
pub struct RandomNaming {
    source: EntropySource,
}

impl RandomNaming {
    /// Random names drawn from the operating system RNG.
    pub fn new() -> Self {
        Self::with_source(|buf| OsRng.try_fill_bytes(buf))
    }

    /// Random names drawn from a custom entropy source.
    pub fn with_source<F>(source: F) -> Self
    where
        F: Fn(&mut [u8]) -> Result<(), rand::Error> + Send + Sync + 'static,
    {
        Self {
            source: Box::new(source),
        }
    }

    /// Generate one identifier.
    pub fn generate(&self) -> Result<Uuid, NamingError> {
        let mut bytes = [0u8; 16];
        (self.source)(&mut bytes)?;
        Ok(Builder::from_random_bytes(bytes).into_uuid())
    }
}

impl Default for RandomNaming {
    fn default() -> Self {
        Self::new()
    }
}

impl NamingStrategy for RandomNaming {
    fn name_for(&self, _payload: &[u8]) -> Result<String, NamingError> {
        Ok(self.generate()?.to_string())
    }
}

impl std::fmt::Debug for RandomNaming {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomNaming").finish_non_exhaustive()
    }
}
