use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::backoff::ExponentialBackoff;
use crate::error::ConfigError;
use crate::policy::RetryPolicy;

/// Serializable retry settings, in milliseconds.
///
/// Every field has a default, so a partial `[retry]` table only overrides
/// what it names. `max_elapsed_ms = 0` means no elapsed-time bound.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub initial_interval_ms: u64,
    pub multiplier: f64,
    pub randomization_factor: f64,
    pub max_interval_ms: u64,
    pub max_elapsed_ms: u64,
    pub max_attempts: Option<u32>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_interval_ms: 500,
            multiplier: 1.5,
            randomization_factor: 0.5,
            max_interval_ms: 60_000,
            max_elapsed_ms: 900_000,
            max_attempts: None,
        }
    }
}

impl RetryConfig {
    /// Check the settings and build the policy they describe.
    pub fn to_policy(&self) -> Result<RetryPolicy, ConfigError> {
        if !self.multiplier.is_finite() || self.multiplier < 1.0 {
            return Err(ConfigError(format!(
                "multiplier must be a finite number >= 1, got {}",
                self.multiplier
            )));
        }
        if !(0.0..=1.0).contains(&self.randomization_factor) {
            return Err(ConfigError(format!(
                "randomization_factor must be within [0, 1], got {}",
                self.randomization_factor
            )));
        }
        if self.max_interval_ms < self.initial_interval_ms {
            return Err(ConfigError(format!(
                "max_interval_ms ({}) is below initial_interval_ms ({})",
                self.max_interval_ms, self.initial_interval_ms
            )));
        }
        if self.max_attempts == Some(0) {
            return Err(ConfigError("max_attempts must be at least 1".into()));
        }

        let backoff = ExponentialBackoff::new()
            .with_initial_interval(Duration::from_millis(self.initial_interval_ms))
            .with_multiplier(self.multiplier)
            .with_randomization_factor(self.randomization_factor)
            .with_max_interval(Duration::from_millis(self.max_interval_ms));

        let mut policy = RetryPolicy::new(backoff);
        if self.max_elapsed_ms > 0 {
            policy = policy.with_max_elapsed(Duration::from_millis(self.max_elapsed_ms));
        }
        if let Some(max) = self.max_attempts {
            policy = policy.with_max_attempts(max);
        }
        Ok(policy)
    }
}
