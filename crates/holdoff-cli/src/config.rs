//! Policy knobs from environment variables with command-line overrides.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use clap::Args;
use holdoff_core::{BackoffPolicy, RetryLimit};

/// Backoff flags shared by the holdoff binaries.
///
/// Unset flags fall back to the `HOLDOFF_*` environment variables, then
/// to the stock defaults.
#[derive(Debug, Args)]
pub struct PolicyArgs {
    /// Initial backoff window in milliseconds
    #[arg(long)]
    pub initial_ms: Option<u64>,

    /// Reset jitter spread in milliseconds
    #[arg(long)]
    pub reset_jitter_ms: Option<u64>,

    /// Window ceiling in milliseconds
    #[arg(long)]
    pub max_ms: Option<u64>,

    /// Attempt budget per cycle; 0 retries forever
    #[arg(long)]
    pub max_attempts: Option<u32>,
}

/// Resolved policy knobs in milliseconds.
#[derive(Debug, Clone)]
pub struct PolicyKnobs {
    pub initial_ms: u64,
    pub reset_jitter_ms: u64,
    pub max_ms: u64,
    pub max_attempts: u32,
}

impl PolicyKnobs {
    /// Read `HOLDOFF_INITIAL_MS`, `HOLDOFF_RESET_JITTER_MS`,
    /// `HOLDOFF_MAX_MS` and `HOLDOFF_MAX_ATTEMPTS`, with the stock
    /// defaults as fallback. A value that does not parse into the
    /// target type falls back too.
    pub fn from_env() -> Self {
        Self {
            initial_ms: env_parse("HOLDOFF_INITIAL_MS", 1000),
            reset_jitter_ms: env_parse("HOLDOFF_RESET_JITTER_MS", 5000),
            max_ms: env_parse("HOLDOFF_MAX_MS", 128_000),
            max_attempts: env_parse("HOLDOFF_MAX_ATTEMPTS", 4),
        }
    }

    /// Command-line flags win over environment values.
    pub fn apply(mut self, args: &PolicyArgs) -> Self {
        if let Some(v) = args.initial_ms {
            self.initial_ms = v;
        }
        if let Some(v) = args.reset_jitter_ms {
            self.reset_jitter_ms = v;
        }
        if let Some(v) = args.max_ms {
            self.max_ms = v;
        }
        if let Some(v) = args.max_attempts {
            self.max_attempts = v;
        }
        self
    }

    pub fn policy(&self) -> BackoffPolicy {
        BackoffPolicy {
            initial_window: Duration::from_millis(self.initial_ms),
            reset_jitter: Duration::from_millis(self.reset_jitter_ms),
            max_window: Duration::from_millis(self.max_ms),
        }
    }

    /// Zero keeps the old command-line shorthand for "retry forever".
    pub fn limit(&self) -> RetryLimit {
        if self.max_attempts == 0 {
            RetryLimit::Unlimited
        } else {
            RetryLimit::Bounded(self.max_attempts)
        }
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knobs() -> PolicyKnobs {
        PolicyKnobs {
            initial_ms: 250,
            reset_jitter_ms: 750,
            max_ms: 8000,
            max_attempts: 6,
        }
    }

    #[test]
    fn knobs_convert_to_durations() {
        let policy = knobs().policy();
        assert_eq!(policy.initial_window, Duration::from_millis(250));
        assert_eq!(policy.reset_jitter, Duration::from_millis(750));
        assert_eq!(policy.max_window, Duration::from_millis(8000));
    }

    #[test]
    fn zero_attempts_means_unlimited() {
        let mut k = knobs();
        k.max_attempts = 0;
        assert_eq!(k.limit(), RetryLimit::Unlimited);
    }

    #[test]
    fn positive_attempts_stay_bounded() {
        assert_eq!(knobs().limit(), RetryLimit::Bounded(6));
    }

    #[test]
    fn flags_override_resolved_knobs() {
        let args = PolicyArgs {
            initial_ms: Some(100),
            reset_jitter_ms: None,
            max_ms: Some(2000),
            max_attempts: None,
        };
        let merged = knobs().apply(&args);
        assert_eq!(merged.initial_ms, 100);
        assert_eq!(merged.reset_jitter_ms, 750);
        assert_eq!(merged.max_ms, 2000);
        assert_eq!(merged.max_attempts, 6);
    }

    // The only test that touches the process environment.
    #[test]
    fn out_of_range_attempts_fall_back_to_default() {
        env::set_var("HOLDOFF_MAX_ATTEMPTS", "4294967296");
        let resolved = PolicyKnobs::from_env();
        env::remove_var("HOLDOFF_MAX_ATTEMPTS");
        assert_eq!(resolved.max_attempts, 4);
    }
}
