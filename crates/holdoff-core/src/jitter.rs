//! Pseudo-random jitter sources for backoff delays.
//!
//! The default generator is a small fixed LCG, so delay schedules are
//! reproducible given a seed. It is not cryptographic and its output is
//! predictable from any observed value; callers that need unpredictable
//! pacing substitute another [`JitterSource`] such as [`ThreadRngJitter`].
//!
//! Every source here emits 15-bit values. With millisecond windows that
//! caps a drawn delay at 32.767 s: once the window outgrows the cap,
//! the extra width no longer widens the possible delays.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

/// Source of bounded, non-negative jitter values.
///
/// `draw` advances internal state on every call. `reseed` re-derives
/// that state from ambient entropy so separate retry cycles do not
/// replay one another's sequences; sources built for replay may keep
/// their sequence instead.
pub trait JitterSource {
    fn reseed(&mut self);
    fn draw(&mut self) -> u32;
}

const LCG_MULTIPLIER: u32 = 0x015a_4e35;
const LCG_INCREMENT: u32 = 1;
const DRAW_MASK: u32 = 0x7fff;

/// 32-bit linear congruential generator emitting 15-bit values.
///
/// Each draw steps `seed = seed * 0x015a4e35 + 1` with wrapping
/// arithmetic and returns bits [16:30] of the new seed, so outputs lie
/// in `[0, 0x7FFF]`.
#[derive(Debug, Clone)]
pub struct LcgJitter {
    seed: u32,
    pinned: bool,
}

impl LcgJitter {
    /// Generator seeded from the clock.
    pub fn new() -> Self {
        Self {
            seed: tick_count(),
            pinned: false,
        }
    }

    /// Deterministic generator for reproducible schedules.
    ///
    /// The sequence stays pinned: `reseed` keeps it in place, so a
    /// replayed schedule survives session resets.
    pub fn from_seed(seed: u32) -> Self {
        Self { seed, pinned: true }
    }
}

impl Default for LcgJitter {
    fn default() -> Self {
        Self::new()
    }
}

impl JitterSource for LcgJitter {
    fn reseed(&mut self) {
        if !self.pinned {
            self.seed = tick_count();
        }
    }

    fn draw(&mut self) -> u32 {
        self.seed = self
            .seed
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        (self.seed >> 16) & DRAW_MASK
    }
}

/// Jitter from the thread-local OS-seeded generator in `rand`.
///
/// Drop-in replacement for [`LcgJitter`] when delays must not be
/// predictable from one observed value. Emits the same 15-bit range.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngJitter;

impl JitterSource for ThreadRngJitter {
    fn reseed(&mut self) {}

    fn draw(&mut self) -> u32 {
        rand::rng().random_range(0..=DRAW_MASK)
    }
}

// Free-running millisecond counter. Only needs to vary across calls,
// not to be wall-clock accurate.
fn tick_count() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u32)
        .unwrap_or(0)
}
