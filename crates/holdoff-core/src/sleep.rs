//! Sleep seam between a session and its host scheduler.

use std::time::Duration;

/// Host delay primitive.
///
/// Implementations block or yield for at least `delay` and are assumed
/// to always succeed; the session never inspects an outcome.
pub trait Sleeper {
    fn sleep_for(&mut self, delay: Duration);
}

/// Blocks the calling thread with `std::thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep_for(&mut self, delay: Duration) {
        std::thread::sleep(delay);
    }
}
