//! Backoff policy and attempt budget configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Window growth configuration for a retry session.
///
/// All three values are durations; window arithmetic happens at
/// whole-millisecond resolution, so anything under a millisecond is
/// treated as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackoffPolicy {
    /// Base of the delay window assigned on reset, before the random
    /// spread is added.
    pub initial_window: Duration,
    /// Upper bound for the one-time random spread added on reset.
    pub reset_jitter: Duration,
    /// Ceiling the window saturates at and never exceeds.
    pub max_window: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial_window: Duration::from_secs(1),
            reset_jitter: Duration::from_secs(5),
            max_window: Duration::from_secs(128),
        }
    }
}

impl BackoffPolicy {
    /// Check the policy for values that could ever produce a zero
    /// window or push a reset above the ceiling.
    ///
    /// Called when a session is constructed so every later window and
    /// modulus is known positive; no per-call guards remain.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.initial_window.as_millis() == 0 {
            return Err(PolicyError::ZeroInitialWindow);
        }
        if self.reset_jitter.as_millis() == 0 {
            return Err(PolicyError::ZeroResetJitter);
        }
        if self.max_window < self.initial_window {
            return Err(PolicyError::MaxBelowInitial {
                initial: self.initial_window,
                max: self.max_window,
            });
        }
        // The whole reset range [initial, initial + jitter) has to fit
        // under the ceiling.
        match self.initial_window.checked_add(self.reset_jitter) {
            Some(ceiling) if ceiling <= self.max_window => Ok(()),
            _ => Err(PolicyError::ResetRangeExceedsMax {
                initial: self.initial_window,
                jitter: self.reset_jitter,
                max: self.max_window,
            }),
        }
    }
}

/// Rejected policy configuration, raised when a session is built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("initial backoff window must be at least one millisecond")]
    ZeroInitialWindow,
    #[error("reset jitter must be at least one millisecond")]
    ZeroResetJitter,
    #[error("max window {max:?} is below the initial window {initial:?}")]
    MaxBelowInitial { initial: Duration, max: Duration },
    #[error("reset range {initial:?} + {jitter:?} does not fit under the max window {max:?}")]
    ResetRangeExceedsMax {
        initial: Duration,
        jitter: Duration,
        max: Duration,
    },
}

/// Attempt budget for a retry session.
///
/// `Bounded(0)` means what it says: the budget is already spent and
/// every call reports exhaustion. Callers that want the legacy "zero
/// means forever" shorthand translate to `Unlimited` at their own edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetryLimit {
    /// Never exhausts; retry forever.
    Unlimited,
    /// At most this many backoffs per cycle.
    Bounded(u32),
}

impl RetryLimit {
    pub fn is_exhausted(self, attempts_done: u32) -> bool {
        match self {
            RetryLimit::Unlimited => false,
            RetryLimit::Bounded(n) => attempts_done >= n,
        }
    }
}

impl Default for RetryLimit {
    fn default() -> Self {
        RetryLimit::Bounded(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy_ms(initial: u64, jitter: u64, max: u64) -> BackoffPolicy {
        BackoffPolicy {
            initial_window: Duration::from_millis(initial),
            reset_jitter: Duration::from_millis(jitter),
            max_window: Duration::from_millis(max),
        }
    }

    #[test]
    fn default_policy_is_valid() {
        assert_eq!(BackoffPolicy::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_initial_window() {
        let policy = policy_ms(0, 5000, 128_000);
        assert_eq!(policy.validate(), Err(PolicyError::ZeroInitialWindow));
    }

    #[test]
    fn rejects_sub_millisecond_initial_window() {
        let mut policy = BackoffPolicy::default();
        policy.initial_window = Duration::from_micros(900);
        assert_eq!(policy.validate(), Err(PolicyError::ZeroInitialWindow));
    }

    #[test]
    fn rejects_zero_reset_jitter() {
        let policy = policy_ms(1000, 0, 128_000);
        assert_eq!(policy.validate(), Err(PolicyError::ZeroResetJitter));
    }

    #[test]
    fn rejects_max_below_initial() {
        let policy = policy_ms(2000, 100, 1000);
        assert_eq!(
            policy.validate(),
            Err(PolicyError::MaxBelowInitial {
                initial: Duration::from_millis(2000),
                max: Duration::from_millis(1000),
            })
        );
    }

    #[test]
    fn rejects_reset_range_that_cannot_fit() {
        let policy = policy_ms(1000, 5000, 4000);
        assert!(matches!(
            policy.validate(),
            Err(PolicyError::ResetRangeExceedsMax { .. })
        ));
    }

    #[test]
    fn unlimited_never_exhausts() {
        assert!(!RetryLimit::Unlimited.is_exhausted(0));
        assert!(!RetryLimit::Unlimited.is_exhausted(u32::MAX));
    }

    #[test]
    fn bounded_budget_exhausts_at_count() {
        let limit = RetryLimit::Bounded(3);
        assert!(!limit.is_exhausted(0));
        assert!(!limit.is_exhausted(2));
        assert!(limit.is_exhausted(3));
        assert!(limit.is_exhausted(4));
    }

    #[test]
    fn zero_bound_is_exhausted_from_the_start() {
        assert!(RetryLimit::Bounded(0).is_exhausted(0));
    }
}
