use thiserror::Error;

/// Errors from naming strategies.
///
/// Every variant is permanent: asking the strategy again will not change a
/// failed entropy source or a broken custom hash function.
#[derive(Debug, Error)]
pub enum NamingError {
    /// The random identifier source could not produce bytes.
    #[error("random identifier source failed: {0}")]
    Entropy(#[from] rand::Error),

    /// The strategy returned an empty object name.
    #[error("naming strategy produced an empty name")]
    EmptyName,

    /// A caller-supplied strategy failed.
    #[error("naming strategy failed: {0}")]
    Custom(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl NamingError {
    /// Wrap an arbitrary error raised by a caller-supplied strategy.
    pub fn custom(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Custom(err.into())
    }
}
