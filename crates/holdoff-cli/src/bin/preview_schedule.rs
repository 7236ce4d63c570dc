//! Dry-run a jittered backoff schedule without sleeping.
//!
//! Prints the delay the session would take at each step and how the
//! window grows toward its ceiling. With `--seed` the schedule is fully
//! reproducible.
//!
//! Usage:
//!   cargo run -p holdoff-cli --bin preview_schedule -- --seed 1 --max-attempts 4

use clap::Parser;
use holdoff_cli::config::{PolicyArgs, PolicyKnobs};
use holdoff_core::{LcgJitter, RetryLimit, RetrySession};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(author, version, about = "Dry-run a jittered backoff schedule")]
struct Args {
    #[command(flatten)]
    policy: PolicyArgs,

    /// Fixed generator seed for a reproducible schedule
    #[arg(long)]
    seed: Option<u32>,

    /// Stop after this many steps
    #[arg(long, default_value_t = 10)]
    steps: u32,

    /// Emit one JSON object per step
    #[arg(long)]
    json: bool,
}

/// One step of the schedule, as emitted in `--json` mode.
#[derive(Serialize)]
struct StepRecord {
    step: u32,
    delay_ms: u64,
    window_before_ms: u64,
    window_after_ms: u64,
    attempts_done: u32,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let knobs = PolicyKnobs::from_env().apply(&args.policy);

    let jitter = match args.seed {
        Some(seed) => LcgJitter::from_seed(seed),
        None => LcgJitter::new(),
    };
    let mut session = RetrySession::with_jitter(knobs.policy(), knobs.limit(), jitter)?;

    if !args.json {
        let policy = session.policy();
        let budget = match session.limit() {
            RetryLimit::Unlimited => "unlimited".to_string(),
            RetryLimit::Bounded(n) => n.to_string(),
        };
        println!(
            "policy: initial {}ms, reset jitter {}ms, max {}ms, budget {}",
            policy.initial_window.as_millis(),
            policy.reset_jitter.as_millis(),
            policy.max_window.as_millis(),
            budget
        );
        println!("primed window: {}ms", session.current_window().as_millis());
    }

    for step in 1..=args.steps {
        let window_before = session.current_window();
        match session.next_backoff() {
            Some(delay) => {
                if args.json {
                    let record = StepRecord {
                        step,
                        delay_ms: delay.as_millis() as u64,
                        window_before_ms: window_before.as_millis() as u64,
                        window_after_ms: session.current_window().as_millis() as u64,
                        attempts_done: session.attempts_done(),
                    };
                    println!("{}", serde_json::to_string(&record)?);
                } else {
                    println!(
                        "step {:>3}: wait {:>6}ms (window {}ms -> {}ms)",
                        step,
                        delay.as_millis(),
                        window_before.as_millis(),
                        session.current_window().as_millis()
                    );
                }
            }
            None => {
                if args.json {
                    eprintln!("budget exhausted at step {}; session reset", step);
                } else {
                    println!(
                        "step {:>3}: budget exhausted; session reset (window {}ms)",
                        step,
                        session.current_window().as_millis()
                    );
                }
                break;
            }
        }
    }

    Ok(())
}
