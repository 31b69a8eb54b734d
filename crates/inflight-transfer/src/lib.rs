//! Retry-classified transfer policy for inflight.
//!
//! One logical storage operation is driven through [`RetryPolicy::run`]:
//!
//! ```text
//! Idle -> Attempting -> Success
//!                    -> Retryable(wait) -> Attempting
//!                    -> Permanent       -> Failed
//!                    -> Exhausted       -> Failed
//! ```
//!
//! The operation classifies each failure itself by returning an [`Attempt`].
//! Retryable failures sleep for the next [`ExponentialBackoff`] interval and
//! try again until the attempt or elapsed-time budget runs out; permanent
//! failures stop immediately. Either way the last error is handed back
//! unchanged inside [`TransferError`].

pub mod backoff;
pub mod config;
pub mod error;
pub mod policy;

pub use backoff::ExponentialBackoff;
pub use config::RetryConfig;
pub use error::{Attempt, ConfigError, TransferError};
pub use policy::RetryPolicy;
