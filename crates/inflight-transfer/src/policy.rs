use std::fmt::Display;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::backoff::ExponentialBackoff;
use crate::error::{Attempt, TransferError};

/// Retries one fallible operation under exponential backoff.
///
/// The budget is bounded by `max_elapsed` (wall-clock time since the first
/// attempt, checked before each sleep) and `max_attempts` (total attempts,
/// the first included). `None` leaves that bound open; with both open only
/// a success or a permanent failure ends the loop.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Interval schedule between attempts.
    pub backoff: ExponentialBackoff,
    /// Stop once the next sleep would cross this much elapsed time.
    pub max_elapsed: Option<Duration>,
    /// Stop after this many attempts.
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    /// Default backoff bounded by 15 minutes of elapsed time.
    fn default() -> Self {
        Self {
            backoff: ExponentialBackoff::new(),
            max_elapsed: Some(Duration::from_secs(15 * 60)),
            max_attempts: None,
        }
    }
}

impl RetryPolicy {
    /// Policy with the given backoff and no bounds.
    pub fn new(backoff: ExponentialBackoff) -> Self {
        Self {
            backoff,
            max_elapsed: None,
            max_attempts: None,
        }
    }

    /// A single attempt, never retried.
    pub fn no_retry() -> Self {
        Self::new(ExponentialBackoff::immediate()).with_max_attempts(1)
    }

    /// Bound the total elapsed time.
    #[must_use]
    pub fn with_max_elapsed(mut self, max: Duration) -> Self {
        self.max_elapsed = Some(max);
        self
    }

    /// Bound the number of attempts.
    #[must_use]
    pub fn with_max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = Some(max);
        self
    }

    /// The wait after attempt number `attempt` failed, or `None` if the
    /// budget is spent.
    pub fn next_delay(&self, attempt: u32, elapsed: Duration) -> Option<Duration> {
        if self.max_attempts.is_some_and(|max| attempt >= max) {
            return None;
        }
        let delay = self.backoff.interval(attempt.saturating_sub(1));
        match self.max_elapsed {
            Some(max) if elapsed.saturating_add(delay) > max => None,
            _ => Some(delay),
        }
    }

    /// Run `op` until it succeeds, fails permanently, or the budget is spent.
    ///
    /// `op` receives the 1-based attempt number. Blocks the calling thread
    /// while waiting between attempts.
    pub fn run<T, E, F>(&self, op: F) -> Result<T, TransferError<E>>
    where
        E: Display,
        F: FnMut(u32) -> Result<T, Attempt<E>>,
    {
        self.run_with_sleep(op, std::thread::sleep)
    }

    /// Like [`run`](Self::run), waiting through `sleep` instead of the thread.
    pub fn run_with_sleep<T, E, F, S>(&self, mut op: F, mut sleep: S) -> Result<T, TransferError<E>>
    where
        E: Display,
        F: FnMut(u32) -> Result<T, Attempt<E>>,
        S: FnMut(Duration),
    {
        let start = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            attempt = attempt.saturating_add(1);
            debug!(attempt, "attempting");

            let err = match op(attempt) {
                Ok(value) => {
                    debug!(attempt, "attempt succeeded");
                    return Ok(value);
                }
                Err(Attempt::Permanent(source)) => {
                    warn!(attempt, error = %source, "permanent failure, not retrying");
                    return Err(TransferError::Permanent {
                        attempts: attempt,
                        source,
                    });
                }
                Err(Attempt::Retryable(err)) => err,
            };

            let elapsed = start.elapsed();
            match self.next_delay(attempt, elapsed) {
                Some(delay) => {
                    warn!(
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "retryable failure, backing off"
                    );
                    sleep(delay);
                }
                None => {
                    warn!(
                        attempt,
                        elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "retries exhausted"
                    );
                    return Err(TransferError::Exhausted {
                        attempts: attempt,
                        elapsed,
                        source: err,
                    });
                }
            }
        }
    }
}
