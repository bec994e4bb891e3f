//! Cumulative traffic counter sources.
//!
//! A counter source reports the device's cumulative rx/tx byte and packet
//! counters: one total across every radio, and one for the mobile radio
//! alone. Wi-Fi is never read directly; the accountant derives it as total
//! minus mobile.

pub mod procfs;

#[cfg(not(target_os = "linux"))]
pub mod noop;

use crate::traffic::CounterSnapshot;

/// Source of cumulative traffic counters.
///
/// Readings are monotonically non-decreasing until device reboot. A source
/// that cannot report traffic returns [`CounterSnapshot::UNSUPPORTED`];
/// the accountant then runs degraded instead of failing.
pub trait CounterSource: Send {
    /// Cumulative counters across every radio on the device.
    fn total(&self) -> CounterSnapshot;

    /// Cumulative counters for the mobile radio alone.
    fn mobile(&self) -> CounterSnapshot;
}

#[cfg(target_os = "linux")]
pub use procfs::{classify_interface, InterfaceClass, ProcfsCounters};

/// Platform-agnostic counter source type alias
#[cfg(target_os = "linux")]
pub type SystemCounters = ProcfsCounters;

#[cfg(not(target_os = "linux"))]
pub use noop::NoopCounters;

/// Platform-agnostic counter source type alias
#[cfg(not(target_os = "linux"))]
pub type SystemCounters = NoopCounters;
