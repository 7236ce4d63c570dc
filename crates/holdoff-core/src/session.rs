//! Retry session state machine.
//!
//! A [`RetrySession`] tracks one continuous cycle of retry attempts: how
//! many backoffs have been consumed and how wide the random delay window
//! has grown. Each failed attempt costs one [`RetrySession::backoff_and_sleep`]
//! (or [`RetrySession::next_backoff`]) call; the window doubles until it
//! saturates at the policy ceiling, and spending the whole attempt budget
//! automatically re-primes the session for a fresh cycle.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::jitter::{JitterSource, LcgJitter};
use crate::policy::{BackoffPolicy, PolicyError, RetryLimit};
use crate::sleep::Sleeper;

/// Outcome of one backoff step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetryStatus {
    /// A delay was taken; attempt the operation again.
    Retrying,
    /// The attempt budget is spent. The session has already been reset
    /// for a new cycle; stop retrying this one.
    Exhausted,
}

/// Per-cycle backoff state, exclusively owned by the caller.
///
/// The jitter source lives inside the session, so independent sessions
/// on different threads never share state and need no lock.
#[derive(Debug, Clone)]
pub struct RetrySession<J: JitterSource = LcgJitter> {
    policy: BackoffPolicy,
    limit: RetryLimit,
    attempts_done: u32,
    window: Duration,
    jitter: J,
}

impl RetrySession<LcgJitter> {
    /// Session backed by the default clock-seeded generator.
    pub fn new(policy: BackoffPolicy, limit: RetryLimit) -> Result<Self, PolicyError> {
        Self::with_jitter(policy, limit, LcgJitter::new())
    }
}

impl<J: JitterSource> RetrySession<J> {
    /// Session backed by a caller-supplied jitter source.
    ///
    /// Validates the policy up front and primes the window with a first
    /// reset, so the session is ready for its first backoff call.
    pub fn with_jitter(
        policy: BackoffPolicy,
        limit: RetryLimit,
        jitter: J,
    ) -> Result<Self, PolicyError> {
        policy.validate()?;
        let mut session = Self {
            policy,
            limit,
            attempts_done: 0,
            window: policy.initial_window,
            jitter,
        };
        session.reset();
        Ok(session)
    }

    /// Start a fresh cycle: reseed the generator, zero the attempt
    /// counter, and re-randomize the starting window so repeated cycles
    /// do not replay identical delay sequences.
    pub fn reset(&mut self) {
        self.jitter.reseed();
        self.attempts_done = 0;
        let spread_ms = millis(self.policy.reset_jitter);
        let j = u64::from(self.jitter.draw()) % spread_ms;
        self.window = self.policy.initial_window + Duration::from_millis(j);
    }

    /// Decide the next step without sleeping.
    ///
    /// Returns the delay to wait before the next attempt, or `None` when
    /// the budget is exhausted, in which case the session has already
    /// been reset for a fresh cycle.
    pub fn next_backoff(&mut self) -> Option<Duration> {
        if self.limit.is_exhausted(self.attempts_done) {
            self.reset();
            return None;
        }
        let window_ms = millis(self.window);
        let delay = Duration::from_millis(u64::from(self.jitter.draw()) % window_ms);
        self.attempts_done = self.attempts_done.saturating_add(1);
        self.advance_window();
        Some(delay)
    }

    /// Take the next backoff delay on `sleeper`, or report exhaustion.
    ///
    /// This is the once-per-failed-attempt entry point. The session
    /// state advances before the sleep runs.
    pub fn backoff_and_sleep<S: Sleeper + ?Sized>(&mut self, sleeper: &mut S) -> RetryStatus {
        match self.next_backoff() {
            Some(delay) => {
                sleeper.sleep_for(delay);
                RetryStatus::Retrying
            }
            None => RetryStatus::Exhausted,
        }
    }

    // Whole-millisecond comparison; an odd ceiling has to saturate to
    // exactly the ceiling instead of doubling past its half.
    fn advance_window(&mut self) {
        if self.window.as_millis() < self.policy.max_window.as_millis() / 2 {
            self.window = self.window.saturating_mul(2);
        } else {
            self.window = self.policy.max_window;
        }
    }

    /// Backoffs consumed in the current cycle.
    pub fn attempts_done(&self) -> u32 {
        self.attempts_done
    }

    /// Current upper bound (exclusive) on the next random delay.
    pub fn current_window(&self) -> Duration {
        self.window
    }

    pub fn limit(&self) -> RetryLimit {
        self.limit
    }

    pub fn policy(&self) -> BackoffPolicy {
        self.policy
    }
}

// Whole milliseconds. Durations past u64::MAX ms clamp so the modulus
// stays positive.
fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
