//! Cumulative traffic counter snapshots.
//!
//! A snapshot is one reading of a radio's receive/transmit byte and packet
//! counters. The counters are cumulative since boot, so two snapshots
//! subtract component-wise to the usage over the interval between them.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Per-field sentinel reported when the platform cannot account traffic.
pub const UNSUPPORTED: i64 = -1;

/// One cumulative reading of a radio's traffic counters.
///
/// Fields are signed: raw readings are non-negative, but the unsupported
/// sentinel is negative, and a subtraction can go negative if the underlying
/// counters were reset between the two readings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    pub rx_bytes: i64,
    pub rx_packets: i64,
    pub tx_bytes: i64,
    pub tx_packets: i64,
}

impl CounterSnapshot {
    /// All counters at zero. Also the "not yet baselined" default.
    pub const ZERO: Self = Self {
        rx_bytes: 0,
        rx_packets: 0,
        tx_bytes: 0,
        tx_packets: 0,
    };

    /// The reading a counter source returns when the platform cannot
    /// report traffic statistics.
    pub const UNSUPPORTED: Self = Self {
        rx_bytes: UNSUPPORTED,
        rx_packets: UNSUPPORTED,
        tx_bytes: UNSUPPORTED,
        tx_packets: UNSUPPORTED,
    };

    pub fn new(rx_bytes: i64, rx_packets: i64, tx_bytes: i64, tx_packets: i64) -> Self {
        Self {
            rx_bytes,
            rx_packets,
            tx_bytes,
            tx_packets,
        }
    }

    /// Whether this reading carries the platform's unsupported sentinel.
    pub fn is_unsupported(&self) -> bool {
        self.rx_bytes == UNSUPPORTED && self.tx_bytes == UNSUPPORTED
    }

    /// Whether all four counters are still at their zero default.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl Add for CounterSnapshot {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            rx_bytes: self.rx_bytes + rhs.rx_bytes,
            rx_packets: self.rx_packets + rhs.rx_packets,
            tx_bytes: self.tx_bytes + rhs.tx_bytes,
            tx_packets: self.tx_packets + rhs.tx_packets,
        }
    }
}

impl Sub for CounterSnapshot {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            rx_bytes: self.rx_bytes - rhs.rx_bytes,
            rx_packets: self.rx_packets - rhs.rx_packets,
            tx_bytes: self.tx_bytes - rhs.tx_bytes,
            tx_packets: self.tx_packets - rhs.tx_packets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_wise_arithmetic() {
        let a = CounterSnapshot::new(3000, 40, 1200, 20);
        let b = CounterSnapshot::new(1000, 10, 500, 5);

        let diff = a - b;
        assert_eq!(diff, CounterSnapshot::new(2000, 30, 700, 15));

        let sum = diff + b;
        assert_eq!(sum, a);
    }

    #[test]
    fn test_delta_then_restore_round_trip() {
        let baseline = CounterSnapshot::new(1000, 10, 500, 5);
        let current = CounterSnapshot::new(1500, 15, 600, 6);

        assert_eq!((current - baseline) + baseline, current);
    }

    #[test]
    fn test_unsupported_sentinel() {
        assert!(CounterSnapshot::UNSUPPORTED.is_unsupported());
        assert!(!CounterSnapshot::ZERO.is_unsupported());
        assert!(!CounterSnapshot::new(1, 1, 1, 1).is_unsupported());
    }

    #[test]
    fn test_zero_default() {
        assert!(CounterSnapshot::default().is_zero());
        assert!(!CounterSnapshot::new(0, 0, 1, 0).is_zero());
    }

    #[test]
    fn test_subtraction_can_go_negative() {
        let before = CounterSnapshot::new(5000, 50, 2000, 20);
        let after_reset = CounterSnapshot::new(100, 1, 40, 1);

        let delta = after_reset - before;
        assert!(delta.rx_bytes < 0);
        assert!(delta.tx_bytes < 0);
    }
}
