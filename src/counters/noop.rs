//! Counter source for platforms without a readable traffic stats file.
//!
//! Always reports the unsupported sentinel, so the accountant runs degraded
//! and the rest of the sensor keeps working.

use crate::counters::CounterSource;
use crate::traffic::CounterSnapshot;

pub struct NoopCounters;

impl NoopCounters {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoopCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterSource for NoopCounters {
    fn total(&self) -> CounterSnapshot {
        CounterSnapshot::UNSUPPORTED
    }

    fn mobile(&self) -> CounterSnapshot {
        CounterSnapshot::UNSUPPORTED
    }
}
