//! Event vocabulary shared by the platform link monitors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kinds of connectivity a monitor can report on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    Airplane,
    Wifi,
    Bluetooth,
    Gps,
    Mobile,
    Wimax,
}

impl LinkKind {
    /// Every kind, in record-code order.
    pub const ALL: [LinkKind; 6] = [
        LinkKind::Airplane,
        LinkKind::Wifi,
        LinkKind::Bluetooth,
        LinkKind::Gps,
        LinkKind::Mobile,
        LinkKind::Wimax,
    ];

    /// Numeric code stored with connectivity records.
    pub fn code(&self) -> i32 {
        match self {
            LinkKind::Airplane => -1,
            LinkKind::Wifi => 1,
            LinkKind::Bluetooth => 2,
            LinkKind::Gps => 3,
            LinkKind::Mobile => 4,
            LinkKind::Wimax => 5,
        }
    }

    /// Subtype label stored with connectivity records.
    pub fn subtype(&self) -> &'static str {
        match self {
            LinkKind::Airplane => "AIRPLANE",
            LinkKind::Wifi => "WIFI",
            LinkKind::Bluetooth => "BLUETOOTH",
            LinkKind::Gps => "GPS",
            LinkKind::Mobile => "MOBILE",
            LinkKind::Wimax => "WIMAX",
        }
    }
}

/// On/off state of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkState {
    On,
    Off,
}

impl LinkState {
    pub fn from_up(up: bool) -> Self {
        if up {
            LinkState::On
        } else {
            LinkState::Off
        }
    }

    /// Numeric code stored with connectivity records.
    pub fn code(&self) -> i32 {
        match self {
            LinkState::On => 1,
            LinkState::Off => 0,
        }
    }

    pub fn is_on(&self) -> bool {
        matches!(self, LinkState::On)
    }
}

/// One observed link transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkChange {
    pub kind: LinkKind,
    pub state: LinkState,
    /// When the transition was observed
    pub timestamp: DateTime<Utc>,
}

impl LinkChange {
    pub fn new(kind: LinkKind, state: LinkState) -> Self {
        Self {
            kind,
            state,
            timestamp: Utc::now(),
        }
    }
}

/// Direction of radio traffic observed since the previous activity check.
///
/// Traffic polls are armed by these signals, never by a timer: a monitor
/// pushes one whenever the direction changes or traffic is flowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataActivity {
    None,
    In,
    Out,
    InOut,
}

impl DataActivity {
    pub fn from_deltas(rx_moved: bool, tx_moved: bool) -> Self {
        match (rx_moved, tx_moved) {
            (true, true) => DataActivity::InOut,
            (true, false) => DataActivity::In,
            (false, true) => DataActivity::Out,
            (false, false) => DataActivity::None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, DataActivity::None)
    }
}

/// Unified event type pushed by a monitor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MonitorEvent {
    /// A link changed state.
    Link(LinkChange),
    /// Radio data activity was observed (or ceased).
    Activity(DataActivity),
    /// Re-evaluated internet reachability. `via` names the carrying link
    /// when the route is attributable to one of the watched kinds.
    Internet {
        reachable: bool,
        via: Option<LinkKind>,
    },
}
