//! Drive the async retry loop against a simulated flaky operation.
//!
//! Each failed call is paid for with a jittered backoff delay; when a
//! cycle's budget runs out the session re-primes itself and the next
//! round starts fresh.
//!
//! Usage:
//!   cargo run -p holdoff-cli --bin flaky_demo -- --success-rate 0.2 --rounds 3

use clap::Parser;
use holdoff_cli::config::{PolicyArgs, PolicyKnobs};
use holdoff_cli::sim::FlakyOp;
use holdoff_core::{LcgJitter, RetrySession};
use holdoff_tokio::retry_with_backoff;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Retry a flaky operation with jittered backoff")]
struct Args {
    #[command(flatten)]
    policy: PolicyArgs,

    /// Probability each call succeeds, between 0 and 1
    #[arg(long, default_value_t = 0.3)]
    success_rate: f64,

    /// Retry cycles to run before giving up for good
    #[arg(long, default_value_t = 3)]
    rounds: u32,

    /// Fixed generator seed for a reproducible schedule
    #[arg(long)]
    seed: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("holdoff_tokio=info".parse()?)
                .add_directive("flaky_demo=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let knobs = PolicyKnobs::from_env().apply(&args.policy);

    let jitter = match args.seed {
        Some(seed) => LcgJitter::from_seed(seed),
        None => LcgJitter::new(),
    };
    let mut session = RetrySession::with_jitter(knobs.policy(), knobs.limit(), jitter)?;
    let mut flaky = FlakyOp::new(args.success_rate);

    tracing::info!(
        "retrying a {:.0}% flaky op (initial {}ms, max {}ms, budget {:?})",
        args.success_rate * 100.0,
        knobs.initial_ms,
        knobs.max_ms,
        knobs.limit()
    );

    for round in 1..=args.rounds {
        let result = retry_with_backoff(&mut session, || {
            let outcome = flaky.call();
            async move { outcome }
        })
        .await;

        match result {
            Ok(call) => {
                println!("success on call {} (round {})", call, round);
                return Ok(());
            }
            Err(err) => {
                tracing::warn!("round {} gave up: {}", round, err);
            }
        }
    }

    anyhow::bail!(
        "no success after {} rounds and {} calls",
        args.rounds,
        flaky.calls()
    )
}
