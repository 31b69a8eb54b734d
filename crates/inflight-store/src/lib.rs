//! Storage client capability for inflight.
//!
//! The facade never talks to a storage SDK directly. It depends only on the
//! narrow [`StorageClient`] trait: put an object, get an object, and say
//! whether a failure is worth retrying.
//!
//! # Backends
//!
//! - [`InMemoryStorageClient`] — `HashMap`-based store for tests and embedding,
//!   with fault injection for exercising retries
//! - [`FsStorageClient`] — objects as files under a root directory
//!
//! # Design Rules
//!
//! 1. The store never interprets payloads; it is a pure key-value store.
//! 2. Puts of an existing key overwrite it.
//! 3. Retryability is decided by the backend that produced the error.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::FsStorageClient;
pub use memory::{InMemoryStorageClient, StoredObject};
pub use traits::StorageClient;
