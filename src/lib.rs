//! Connectivity Sensor - background link-state and traffic-usage recorder.
//!
//! This library watches OS-level connectivity (Wi-Fi, bluetooth, mobile
//! data, GPS, airplane mode, WiMAX), records every observed transition and
//! per-interval traffic usage into a local append-only store, and notifies
//! an application-supplied observer plus a fire-and-forget broadcast bus.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Connectivity Sensor                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐        │
//! │  │   Monitor   │──▶│   Sensor    │──▶│    Store    │        │
//! │  │  (sysfs)    │   │  dispatch   │   │  (jsonl)    │        │
//! │  └─────────────┘   └──────┬──────┘   └─────────────┘        │
//! │  ┌─────────────┐          │          ┌─────────────┐        │
//! │  │  Counters   │──────────┼─────────▶│  Observer   │        │
//! │  │ (/proc/net) │          ▼          │ + Broadcast │        │
//! │  └─────────────┘   ┌─────────────┐   └─────────────┘        │
//! │                    │  Traffic    │                          │
//! │                    │ Accountant  │                          │
//! │                    └─────────────┘                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Traffic accounting is event-driven: the monitor pushes a data-activity
//! signal whenever radio traffic starts, changes direction, or stops, and
//! each signal triggers one poll of the delta accountant. There is no
//! traffic timer.
//!
//! # Example
//!
//! ```no_run
//! use connectivity_sensor::{
//!     monitor::{Monitor, MonitorConfig},
//!     stats::create_shared_stats,
//!     store::JsonlStore,
//!     Config, ConnectivitySensor, SystemCounters,
//! };
//!
//! let config = Config::default();
//! let store = JsonlStore::new(config.data_path.join("records"));
//!
//! let mut sensor = ConnectivitySensor::new(
//!     config.clone(),
//!     Box::new(SystemCounters::new()),
//!     Box::new(store),
//!     None,
//!     create_shared_stats(),
//! );
//! sensor.activate();
//!
//! let mut monitor = Monitor::new(MonitorConfig::default());
//! monitor.start().expect("Failed to start monitor");
//!
//! // Events can be received from monitor.receiver() and fed to
//! // sensor.handle(event)
//! ```

pub mod broadcast;
pub mod config;
pub mod counters;
pub mod events;
pub mod monitor;
pub mod records;
pub mod sensor;
pub mod stats;
pub mod store;
pub mod traffic;

// Re-export key types at crate root for convenience
pub use broadcast::{Broadcast, Broadcaster};
pub use config::{Config, ConfigError};
pub use counters::{CounterSource, SystemCounters};
pub use events::{Observer, SensorEvent};
pub use monitor::{DataActivity, LinkChange, LinkKind, LinkState, Monitor, MonitorEvent};
pub use records::{ConnectivityRecord, Identity, RadioClass, UsageSample};
pub use sensor::ConnectivitySensor;
pub use stats::{SessionStats, SharedSessionStats, StatsSnapshot};
pub use store::{JsonlStore, Store};
pub use traffic::{CounterSnapshot, PollOutcome, TrafficAccountant};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
