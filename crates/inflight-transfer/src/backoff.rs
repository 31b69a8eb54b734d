//! Exponential backoff intervals.
//!
//! The interval before retry `n` (counting from zero) is
//! `min(initial * multiplier^n, max_interval)`, then spread uniformly over
//! `±randomization_factor` of itself.

use std::time::Duration;

use rand::Rng;

/// Exponentially growing, optionally jittered retry intervals.
#[derive(Debug, Clone, PartialEq)]
pub struct ExponentialBackoff {
    /// Interval before the first retry.
    pub initial_interval: Duration,

    /// Growth factor applied per retry.
    pub multiplier: f64,

    /// Relative jitter in `[0, 1]`; `0` disables jitter.
    pub randomization_factor: f64,

    /// Cap on the un-jittered interval.
    pub max_interval: Duration,
}

impl ExponentialBackoff {
    /// 500ms initial interval growing by 1.5x up to 60s, with ±50% jitter.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            initial_interval: Duration::from_millis(500),
            multiplier: 1.5,
            randomization_factor: 0.5,
            max_interval: Duration::from_secs(60),
        }
    }

    /// No waiting between retries.
    #[must_use]
    pub const fn immediate() -> Self {
        Self {
            initial_interval: Duration::ZERO,
            multiplier: 1.0,
            randomization_factor: 0.0,
            max_interval: Duration::ZERO,
        }
    }

    /// Set the initial interval.
    #[must_use]
    pub const fn with_initial_interval(mut self, initial: Duration) -> Self {
        self.initial_interval = initial;
        self
    }

    /// Set the multiplier.
    #[must_use]
    pub const fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Set the randomization factor.
    #[must_use]
    pub const fn with_randomization_factor(mut self, factor: f64) -> Self {
        self.randomization_factor = factor;
        self
    }

    /// Set the interval cap.
    #[must_use]
    pub const fn with_max_interval(mut self, max: Duration) -> Self {
        self.max_interval = max;
        self
    }

    /// The capped interval before retry `retry`, without jitter.
    pub fn base_interval(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let secs = self.initial_interval.as_secs_f64() * self.multiplier.powi(exponent);
        let capped = secs.min(self.max_interval.as_secs_f64());
        Duration::try_from_secs_f64(capped).unwrap_or(self.max_interval)
    }

    /// The interval before retry `retry` for a jitter sample in `[0, 1)`.
    ///
    /// A sample of `0.5` yields the base interval; the extremes yield
    /// `base * (1 ± randomization_factor)`.
    pub fn interval_with_sample(&self, retry: u32, sample: f64) -> Duration {
        let base = self.base_interval(retry);
        let factor = self.randomization_factor.clamp(0.0, 1.0);
        if factor == 0.0 {
            return base;
        }
        let spread = 1.0 - factor + 2.0 * factor * sample.clamp(0.0, 1.0);
        Duration::try_from_secs_f64(base.as_secs_f64() * spread).unwrap_or(base)
    }

    /// The interval before retry `retry`, jittered from the thread RNG.
    pub fn interval(&self, retry: u32) -> Duration {
        let sample = rand::thread_rng().gen::<f64>();
        self.interval_with_sample(retry, sample)
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self::new()
    }
}
