//! holdoff CLI - demo and preview tools for retry pacing.
//!
//! This crate provides two binaries:
//! - preview_schedule: dry-run a backoff schedule without sleeping
//! - flaky_demo: drive the async retry loop against a simulated flaky op

pub mod config;
pub mod sim;

pub use config::PolicyKnobs;
