//! Simulated unreliable operation for the demo binary.

use anyhow::anyhow;
use rand::Rng;

/// An operation that succeeds with a configured probability.
#[derive(Debug, Clone)]
pub struct FlakyOp {
    success_rate: f64,
    calls: u32,
}

impl FlakyOp {
    /// `success_rate` is clamped into `[0, 1]`.
    pub fn new(success_rate: f64) -> Self {
        Self {
            success_rate: success_rate.clamp(0.0, 1.0),
            calls: 0,
        }
    }

    /// One simulated call. Errors carry the call number so log lines
    /// can be told apart.
    pub fn call(&mut self) -> anyhow::Result<u32> {
        self.calls += 1;
        let roll: f64 = rand::rng().random_range(0.0..1.0);
        if roll < self.success_rate {
            Ok(self.calls)
        } else {
            Err(anyhow!("simulated outage on call {}", self.calls))
        }
    }

    /// Total calls made so far.
    pub fn calls(&self) -> u32 {
        self.calls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certain_success_succeeds_first_call() {
        let mut op = FlakyOp::new(1.0);
        assert_eq!(op.call().unwrap(), 1);
    }

    #[test]
    fn certain_failure_always_fails() {
        let mut op = FlakyOp::new(0.0);
        for _ in 0..20 {
            assert!(op.call().is_err());
        }
        assert_eq!(op.calls(), 20);
    }

    #[test]
    fn rate_is_clamped() {
        let mut op = FlakyOp::new(7.5);
        assert!(op.call().is_ok());
    }
}
