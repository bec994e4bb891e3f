//! Fire-and-forget broadcast bus.
//!
//! The in-process equivalent of system-wide broadcast intents: every
//! subscriber gets a copy of each action, and a slow or departed subscriber
//! never blocks the sensor. Actions carry no payload beyond their name and
//! fire time; consumers wanting data attach a [`crate::events::Observer`]
//! instead.

use crate::monitor::types::{LinkKind, LinkState};
use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, Sender};

pub const ACTION_AIRPLANE_ON: &str = "connectivity.AIRPLANE_ON";
pub const ACTION_AIRPLANE_OFF: &str = "connectivity.AIRPLANE_OFF";
pub const ACTION_WIFI_ON: &str = "connectivity.WIFI_ON";
pub const ACTION_WIFI_OFF: &str = "connectivity.WIFI_OFF";
pub const ACTION_BLUETOOTH_ON: &str = "connectivity.BLUETOOTH_ON";
pub const ACTION_BLUETOOTH_OFF: &str = "connectivity.BLUETOOTH_OFF";
pub const ACTION_GPS_ON: &str = "connectivity.GPS_ON";
pub const ACTION_GPS_OFF: &str = "connectivity.GPS_OFF";
pub const ACTION_MOBILE_ON: &str = "connectivity.MOBILE_ON";
pub const ACTION_MOBILE_OFF: &str = "connectivity.MOBILE_OFF";
pub const ACTION_WIMAX_ON: &str = "connectivity.WIMAX_ON";
pub const ACTION_WIMAX_OFF: &str = "connectivity.WIMAX_OFF";
pub const ACTION_INTERNET_AVAILABLE: &str = "connectivity.INTERNET_AVAILABLE";
pub const ACTION_INTERNET_UNAVAILABLE: &str = "connectivity.INTERNET_UNAVAILABLE";
/// Fired once per traffic poll, with no payload.
pub const ACTION_TRAFFIC: &str = "connectivity.TRAFFIC";

/// The broadcast action for a link transition.
pub fn link_action(kind: LinkKind, state: LinkState) -> &'static str {
    match (kind, state) {
        (LinkKind::Airplane, LinkState::On) => ACTION_AIRPLANE_ON,
        (LinkKind::Airplane, LinkState::Off) => ACTION_AIRPLANE_OFF,
        (LinkKind::Wifi, LinkState::On) => ACTION_WIFI_ON,
        (LinkKind::Wifi, LinkState::Off) => ACTION_WIFI_OFF,
        (LinkKind::Bluetooth, LinkState::On) => ACTION_BLUETOOTH_ON,
        (LinkKind::Bluetooth, LinkState::Off) => ACTION_BLUETOOTH_OFF,
        (LinkKind::Gps, LinkState::On) => ACTION_GPS_ON,
        (LinkKind::Gps, LinkState::Off) => ACTION_GPS_OFF,
        (LinkKind::Mobile, LinkState::On) => ACTION_MOBILE_ON,
        (LinkKind::Mobile, LinkState::Off) => ACTION_MOBILE_OFF,
        (LinkKind::Wimax, LinkState::On) => ACTION_WIMAX_ON,
        (LinkKind::Wimax, LinkState::Off) => ACTION_WIMAX_OFF,
    }
}

/// One broadcast: an action name and when it was fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Broadcast {
    pub action: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Fan-out sender for broadcast actions.
pub struct Broadcaster {
    subscribers: Vec<Sender<Broadcast>>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    /// Register a new subscriber and return its receiving end.
    pub fn subscribe(&mut self) -> Receiver<Broadcast> {
        // Bounded so one stalled subscriber cannot grow without limit;
        // overflow drops the broadcast for that subscriber only.
        let (sender, receiver) = bounded(1024);
        self.subscribers.push(sender);
        receiver
    }

    /// Fire an action to every subscriber. Never blocks, never fails.
    pub fn send(&self, action: &'static str) {
        let broadcast = Broadcast {
            action,
            timestamp: Utc::now(),
        };
        for subscriber in &self.subscribers {
            let _ = subscriber.try_send(broadcast);
        }
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}
