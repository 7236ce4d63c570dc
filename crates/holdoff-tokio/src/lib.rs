//! Tokio adapter for holdoff retry sessions.
//!
//! The core crate sleeps by blocking a thread; these helpers take the
//! same decisions on the tokio clock instead, plus a retry combinator
//! shaped like a connect-until-exhausted loop.

use std::fmt::Display;
use std::future::Future;

pub use holdoff_core::{
    BackoffPolicy, JitterSource, LcgJitter, PolicyError, RetryLimit, RetrySession, RetryStatus,
};

/// Async twin of [`RetrySession::backoff_and_sleep`].
///
/// The session advances before the sleep, so cancelling the returned
/// future never loses the attempt accounting.
pub async fn backoff_and_sleep<J: JitterSource>(session: &mut RetrySession<J>) -> RetryStatus {
    match session.next_backoff() {
        Some(delay) => {
            tokio::time::sleep(delay).await;
            RetryStatus::Retrying
        }
        None => RetryStatus::Exhausted,
    }
}

/// Run `op` until it succeeds or the session's budget is exhausted.
///
/// Each failure is paid for with one backoff delay and logged; on
/// exhaustion the last error comes back to the caller and the session
/// is already primed for a fresh cycle.
pub async fn retry_with_backoff<J, T, E, F, Fut>(
    session: &mut RetrySession<J>,
    mut op: F,
) -> Result<T, E>
where
    J: JitterSource,
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => match session.next_backoff() {
                Some(delay) => {
                    tracing::warn!(
                        "attempt {} failed: {} (backing off {:?})",
                        session.attempts_done(),
                        err,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                None => {
                    tracing::warn!("retries exhausted: {}", err);
                    return Err(err);
                }
            },
        }
    }
}
