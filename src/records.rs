//! Record types persisted by the sensor.

use crate::monitor::types::{LinkChange, LinkKind, LinkState};
use crate::traffic::CounterSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Caller-supplied identity attached to every emitted record.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Stable device identifier
    pub device_id: String,
    /// User-assigned label, replaceable at runtime
    pub label: String,
}

impl Identity {
    pub fn new(device_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            label: label.into(),
        }
    }
}

/// Radio class a usage sample accounts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadioClass {
    Mobile,
    Wifi,
}

/// One per-interval usage record for a single radio class.
///
/// The four counters are deltas against the previous poll's baseline. They
/// can go negative only when the underlying cumulative counters were reset
/// mid-session; the value is recorded as observed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageSample {
    pub timestamp: DateTime<Utc>,
    pub device_id: String,
    pub label: String,
    pub radio: RadioClass,
    pub rx_bytes: i64,
    pub rx_packets: i64,
    pub tx_bytes: i64,
    pub tx_packets: i64,
}

impl UsageSample {
    pub const TABLE_NAME: &'static str = "trafficData";

    pub fn new(radio: RadioClass, delta: CounterSnapshot, identity: &Identity) -> Self {
        Self {
            timestamp: Utc::now(),
            device_id: identity.device_id.clone(),
            label: identity.label.clone(),
            radio,
            rx_bytes: delta.rx_bytes,
            rx_packets: delta.rx_packets,
            tx_bytes: delta.tx_bytes,
            tx_packets: delta.tx_packets,
        }
    }

    /// The four delta counters as a snapshot.
    pub fn delta(&self) -> CounterSnapshot {
        CounterSnapshot::new(self.rx_bytes, self.rx_packets, self.tx_bytes, self.tx_packets)
    }
}

/// One recorded link transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectivityRecord {
    pub timestamp: DateTime<Utc>,
    pub device_id: String,
    pub label: String,
    pub kind: LinkKind,
    /// Numeric kind code, kept alongside the kind for tabular consumers
    pub type_code: i32,
    pub subtype: String,
    pub state: LinkState,
}

impl ConnectivityRecord {
    pub const TABLE_NAME: &'static str = "connectivityData";

    pub fn new(change: &LinkChange, identity: &Identity) -> Self {
        Self {
            timestamp: change.timestamp,
            device_id: identity.device_id.clone(),
            label: identity.label.clone(),
            kind: change.kind,
            type_code: change.kind.code(),
            subtype: change.kind.subtype().to_string(),
            state: change.state,
        }
    }
}
