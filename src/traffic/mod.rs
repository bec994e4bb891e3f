//! Traffic accounting core.
//!
//! This module contains:
//! - Cumulative counter snapshots and their arithmetic
//! - The delta accountant that turns counter readings into usage samples

pub mod accountant;
pub mod snapshot;

// Re-export commonly used types
pub use accountant::{PollOutcome, TrafficAccountant};
pub use snapshot::{CounterSnapshot, UNSUPPORTED};
