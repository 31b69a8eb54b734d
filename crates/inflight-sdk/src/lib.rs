//! High-level facade for inflight.
//!
//! [`Inflight`] hides the storage endpoint behind two calls:
//!
//! - [`Inflight::write`] names a payload, stores it under
//!   `container/path/name` and returns a [`Reference`]
//! - [`Inflight::read`] fetches the bytes stored under a name
//!
//! Both run through a [`RetryPolicy`], so transient backend failures are
//! retried with exponential backoff while permanent ones surface at once.

pub mod config;
pub mod error;
pub mod inflight;

pub use config::{ConfigError, InflightConfig};
pub use error::{InflightError, InflightResult, Operation};
pub use inflight::{Inflight, InflightBuilder};

// Re-export key types
pub use inflight_naming::{ContentHashNaming, NamingError, NamingKind, NamingStrategy, RandomNaming};
pub use inflight_store::{FsStorageClient, InMemoryStorageClient, StorageClient, StoreError};
pub use inflight_transfer::{ExponentialBackoff, RetryConfig, RetryPolicy};
pub use inflight_types::{object_key, Reference, DEFAULT_CONTENT_TYPE};
