//! Foundation types for inflight.
//!
//! Every other inflight crate depends on `inflight-types`.
//!
//! # Key Types
//!
//! - [`Reference`] — Where a written payload lives: container, path and object name
//! - [`object_key`] — Platform-independent construction of the physical object key
//! - [`DEFAULT_CONTENT_TYPE`] — Content type stamped on every stored payload

pub mod error;
pub mod key;
pub mod reference;

pub use error::TypeError;
pub use key::object_key;
pub use reference::Reference;

/// Content type attached to payloads when the facade is not given another one.
pub const DEFAULT_CONTENT_TYPE: &str = "binary/octet-stream";
