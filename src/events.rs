//! Observer surface of the sensor.
//!
//! Every notification flows through a single handler as one event enum, so
//! a consumer's `match` is checked for exhaustiveness by the compiler
//! instead of relying on a wide callback interface with forgettable
//! methods.

use crate::monitor::types::{LinkChange, LinkKind};
use crate::records::UsageSample;

/// Everything the sensor can tell an observer.
#[derive(Debug, Clone)]
pub enum SensorEvent {
    /// A link changed state.
    Link(LinkChange),
    /// A route to the internet exists, through the given link kind when
    /// the route is attributable to one.
    InternetAvailable(Option<LinkKind>),
    /// No route to the internet exists.
    InternetUnavailable,
    /// Per-interval Wi-Fi usage.
    WifiTraffic(UsageSample),
    /// Per-interval mobile usage.
    MobileTraffic(UsageSample),
    /// A data-activity check found no traffic.
    TrafficIdle,
}

/// Application-supplied event handler, invoked synchronously from the
/// sensor's dispatch loop.
pub trait Observer: Send + Sync {
    fn on_event(&self, event: &SensorEvent);
}
