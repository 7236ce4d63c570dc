pub mod flaky;

pub use flaky::FlakyOp;
