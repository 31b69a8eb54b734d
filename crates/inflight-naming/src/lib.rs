//! Object naming strategies for inflight.
//!
//! A naming strategy turns a fully materialized payload into the final path
//! segment it is stored under. Two strategies ship with the crate:
//!
//! - [`ContentHashNaming`] — lowercase hex BLAKE3 digest of the payload.
//!   Identical payloads share a name, so rewriting them is a harmless overwrite.
//! - [`RandomNaming`] — a fresh 128-bit random identifier per call,
//!   uncorrelated with the payload.
//!
//! Any `Fn(&[u8]) -> Result<String, NamingError>` closure is also a strategy.

pub mod content;
pub mod error;
pub mod random;
pub mod strategy;

pub use content::ContentHashNaming;
pub use error::NamingError;
pub use random::RandomNaming;
pub use strategy::{NamingKind, NamingStrategy};
