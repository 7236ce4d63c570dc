pub mod jitter;
pub mod policy;
pub mod session;
pub mod sleep;

pub use jitter::{JitterSource, LcgJitter, ThreadRngJitter};
pub use policy::{BackoffPolicy, PolicyError, RetryLimit};
pub use session::{RetrySession, RetryStatus};
pub use sleep::{Sleeper, ThreadSleeper};
