//! The connectivity sensor.
//!
//! Consumes [`MonitorEvent`]s one at a time and drives the three output
//! sinks: the record store, the observer, and the broadcast bus. Link
//! transitions become connectivity records, data-activity signals become
//! traffic polls against the delta accountant, and reachability changes
//! become internet events.
//!
//! The sensor never fails the event loop: a sink error is logged and the
//! next event is processed.

use crate::broadcast::{self, Broadcast, Broadcaster};
use crate::counters::CounterSource;
use crate::events::{Observer, SensorEvent};
use crate::monitor::types::{DataActivity, LinkChange, LinkKind, MonitorEvent};
use crate::records::{ConnectivityRecord, Identity, UsageSample};
use crate::stats::SharedSessionStats;
use crate::store::Store;
use crate::traffic::{PollOutcome, TrafficAccountant};
use crate::Config;
use crossbeam_channel::Receiver;
use serde::Serialize;

/// One running sensor instance.
pub struct ConnectivitySensor {
    config: Config,
    identity: Identity,
    accountant: TrafficAccountant,
    counters: Box<dyn CounterSource>,
    store: Box<dyn Store>,
    observer: Option<Box<dyn Observer>>,
    broadcaster: Broadcaster,
    stats: SharedSessionStats,
}

impl ConnectivitySensor {
    /// Create a sensor. Captures the creation-time counter totals for the
    /// traffic accountant; call [`activate`](Self::activate) once the
    /// monitor is running to arm traffic polling.
    pub fn new(
        config: Config,
        counters: Box<dyn CounterSource>,
        store: Box<dyn Store>,
        observer: Option<Box<dyn Observer>>,
        stats: SharedSessionStats,
    ) -> Self {
        let identity = Identity::new(config.device_id.clone(), config.label.clone());
        let accountant = TrafficAccountant::new(counters.total());

        Self {
            config,
            identity,
            accountant,
            counters,
            store,
            observer,
            broadcaster: Broadcaster::new(),
            stats,
        }
    }

    /// Arm traffic polling. Returns `false` when the platform cannot
    /// account traffic; the sensor then runs without usage samples.
    pub fn activate(&mut self) -> bool {
        self.accountant.activate(self.counters.mobile())
    }

    /// Register a broadcast subscriber.
    pub fn subscribe_broadcasts(&mut self) -> Receiver<Broadcast> {
        self.broadcaster.subscribe()
    }

    /// Process one monitor event.
    pub fn handle(&mut self, event: MonitorEvent) {
        match event {
            MonitorEvent::Link(change) => self.handle_link(change),
            MonitorEvent::Internet { reachable, via } => self.handle_internet(reachable, via),
            MonitorEvent::Activity(activity) => self.handle_activity(activity),
        }
    }

    /// Replace the user label. Value substitution only; records emitted
    /// from here on carry the new label.
    pub fn set_label(&mut self, label: impl Into<String>) {
        let label = label.into();
        self.config.label = label.clone();
        self.identity.label = label;
    }

    /// The label currently attached to emitted records.
    pub fn label(&self) -> &str {
        &self.config.label
    }

    /// Whether the platform reported traffic statistics as unavailable.
    pub fn traffic_degraded(&self) -> bool {
        self.accountant.is_degraded()
    }

    fn handle_link(&mut self, change: LinkChange) {
        self.stats.record_link_event();

        let record = ConnectivityRecord::new(&change, &self.identity);
        self.save(ConnectivityRecord::TABLE_NAME, &record);

        self.notify(&SensorEvent::Link(change));
        self.broadcaster
            .send(broadcast::link_action(change.kind, change.state));
    }

    fn handle_internet(&mut self, reachable: bool, via: Option<LinkKind>) {
        self.stats.record_internet_change();

        if reachable {
            self.notify(&SensorEvent::InternetAvailable(via));
            self.broadcaster.send(broadcast::ACTION_INTERNET_AVAILABLE);
        } else {
            self.notify(&SensorEvent::InternetUnavailable);
            self.broadcaster
                .send(broadcast::ACTION_INTERNET_UNAVAILABLE);
        }
    }

    fn handle_activity(&mut self, activity: DataActivity) {
        self.stats.record_traffic_poll();

        let outcome = self.accountant.poll(
            activity,
            self.counters.mobile(),
            self.counters.total(),
            &self.identity,
        );

        match outcome {
            PollOutcome::Idle => {
                self.stats.record_idle_signal();
                self.notify(&SensorEvent::TrafficIdle);
            }
            PollOutcome::Skipped => {}
            PollOutcome::Samples { wifi, mobile } => {
                self.save(UsageSample::TABLE_NAME, &wifi);
                self.save(UsageSample::TABLE_NAME, &mobile);

                self.notify(&SensorEvent::WifiTraffic(wifi));
                self.notify(&SensorEvent::MobileTraffic(mobile));

                // One payload-free broadcast per sample-emitting poll
                self.broadcaster.send(broadcast::ACTION_TRAFFIC);
                self.stats.record_usage_samples(2);
            }
        }
    }

    fn save<R: Serialize>(&mut self, table: &str, record: &R) {
        let value = match serde_json::to_value(record) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("could not serialize {table} record: {e}");
                return;
            }
        };
        if let Err(e) = self.store.save(table, value) {
            tracing::warn!("could not save {table} record: {e}");
        }
    }

    fn notify(&self, event: &SensorEvent) {
        if let Some(ref observer) = self.observer {
            observer.on_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::types::{LinkKind, LinkState};
    use crate::stats::create_shared_stats;
    use crate::store::StoreError;
    use crate::traffic::CounterSnapshot;
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct FakeCounters {
        readings: Arc<Mutex<(CounterSnapshot, CounterSnapshot)>>,
    }

    impl FakeCounters {
        fn new(mobile: CounterSnapshot, total: CounterSnapshot) -> Self {
            Self {
                readings: Arc::new(Mutex::new((mobile, total))),
            }
        }

        fn set(&self, mobile: CounterSnapshot, total: CounterSnapshot) {
            *self.readings.lock().unwrap() = (mobile, total);
        }
    }

    impl CounterSource for FakeCounters {
        fn total(&self) -> CounterSnapshot {
            self.readings.lock().unwrap().1
        }

        fn mobile(&self) -> CounterSnapshot {
            self.readings.lock().unwrap().0
        }
    }

    #[derive(Clone, Default)]
    struct RecordingStore {
        saved: Arc<Mutex<Vec<(String, serde_json::Value)>>>,
    }

    impl Store for RecordingStore {
        fn save(&mut self, table: &str, record: serde_json::Value) -> Result<(), StoreError> {
            self.saved.lock().unwrap().push((table.to_string(), record));
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct RecordingObserver {
        events: Arc<Mutex<Vec<SensorEvent>>>,
    }

    impl Observer for RecordingObserver {
        fn on_event(&self, event: &SensorEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    fn snapshot(rx_bytes: i64, tx_bytes: i64) -> CounterSnapshot {
        CounterSnapshot::new(rx_bytes, rx_bytes / 100, tx_bytes, tx_bytes / 100)
    }

    fn test_config() -> Config {
        Config {
            device_id: "device-1".to_string(),
            label: "study-a".to_string(),
            ..Config::default()
        }
    }

    fn build_sensor(
        counters: FakeCounters,
    ) -> (ConnectivitySensor, RecordingStore, RecordingObserver) {
        let store = RecordingStore::default();
        let observer = RecordingObserver::default();
        let sensor = ConnectivitySensor::new(
            test_config(),
            Box::new(counters.clone()),
            Box::new(store.clone()),
            Some(Box::new(observer.clone())),
            create_shared_stats(),
        );
        (sensor, store, observer)
    }

    #[test]
    fn test_link_event_reaches_every_sink() {
        let counters = FakeCounters::new(snapshot(1000, 500), snapshot(3000, 1200));
        let (mut sensor, store, observer) = build_sensor(counters);
        let broadcasts = sensor.subscribe_broadcasts();

        sensor.handle(MonitorEvent::Link(LinkChange::new(
            LinkKind::Wifi,
            LinkState::On,
        )));

        let saved = store.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].0, "connectivityData");
        assert_eq!(saved[0].1["type_code"], 1);
        assert_eq!(saved[0].1["device_id"], "device-1");

        let events = observer.events.lock().unwrap();
        assert!(matches!(events[0], SensorEvent::Link(_)));

        assert_eq!(
            broadcasts.try_recv().unwrap().action,
            broadcast::ACTION_WIFI_ON
        );
    }

    #[test]
    fn test_activity_poll_emits_samples_and_broadcast() {
        let counters = FakeCounters::new(snapshot(1000, 500), snapshot(3000, 1200));
        let (mut sensor, store, observer) = build_sensor(counters.clone());
        let broadcasts = sensor.subscribe_broadcasts();
        assert!(sensor.activate());

        counters.set(snapshot(1500, 600), snapshot(4000, 1800));
        sensor.handle(MonitorEvent::Activity(DataActivity::InOut));

        let saved = store.saved.lock().unwrap();
        assert_eq!(saved.len(), 2);
        // Wi-Fi sample first, then mobile.
        assert_eq!(saved[0].0, "trafficData");
        assert_eq!(saved[0].1["radio"], "wifi");
        assert_eq!(saved[0].1["rx_bytes"], 500);
        assert_eq!(saved[1].1["radio"], "mobile");
        assert_eq!(saved[1].1["rx_bytes"], 500);
        assert_eq!(saved[1].1["tx_bytes"], 100);

        let events = observer.events.lock().unwrap();
        assert!(matches!(events[0], SensorEvent::WifiTraffic(_)));
        assert!(matches!(events[1], SensorEvent::MobileTraffic(_)));

        assert_eq!(
            broadcasts.try_recv().unwrap().action,
            broadcast::ACTION_TRAFFIC
        );
        // Exactly one broadcast per poll.
        assert!(broadcasts.is_empty());
    }

    #[test]
    fn test_idle_activity_emits_no_samples() {
        let counters = FakeCounters::new(snapshot(1000, 500), snapshot(3000, 1200));
        let (mut sensor, store, observer) = build_sensor(counters);
        let broadcasts = sensor.subscribe_broadcasts();
        sensor.activate();

        sensor.handle(MonitorEvent::Activity(DataActivity::None));

        assert!(store.saved.lock().unwrap().is_empty());
        let events = observer.events.lock().unwrap();
        assert!(matches!(events[0], SensorEvent::TrafficIdle));
        assert!(broadcasts.is_empty());
    }

    #[test]
    fn test_degraded_platform_never_emits_samples() {
        let counters =
            FakeCounters::new(CounterSnapshot::UNSUPPORTED, CounterSnapshot::UNSUPPORTED);
        let (mut sensor, store, _observer) = build_sensor(counters);

        assert!(!sensor.activate());
        assert!(sensor.traffic_degraded());

        sensor.handle(MonitorEvent::Activity(DataActivity::InOut));
        assert!(store.saved.lock().unwrap().is_empty());
    }

    #[test]
    fn test_internet_events() {
        let counters = FakeCounters::new(snapshot(1000, 500), snapshot(3000, 1200));
        let (mut sensor, _store, observer) = build_sensor(counters);
        let broadcasts = sensor.subscribe_broadcasts();

        sensor.handle(MonitorEvent::Internet {
            reachable: true,
            via: Some(LinkKind::Wifi),
        });
        sensor.handle(MonitorEvent::Internet {
            reachable: false,
            via: None,
        });

        let events = observer.events.lock().unwrap();
        assert!(matches!(
            events[0],
            SensorEvent::InternetAvailable(Some(LinkKind::Wifi))
        ));
        assert!(matches!(events[1], SensorEvent::InternetUnavailable));

        assert_eq!(
            broadcasts.try_recv().unwrap().action,
            broadcast::ACTION_INTERNET_AVAILABLE
        );
        assert_eq!(
            broadcasts.try_recv().unwrap().action,
            broadcast::ACTION_INTERNET_UNAVAILABLE
        );
    }

    #[test]
    fn test_set_label_applies_to_subsequent_records() {
        let counters = FakeCounters::new(snapshot(1000, 500), snapshot(3000, 1200));
        let (mut sensor, store, _observer) = build_sensor(counters);

        sensor.handle(MonitorEvent::Link(LinkChange::new(
            LinkKind::Gps,
            LinkState::Off,
        )));
        sensor.set_label("study-b");
        sensor.handle(MonitorEvent::Link(LinkChange::new(
            LinkKind::Gps,
            LinkState::On,
        )));

        let saved = store.saved.lock().unwrap();
        assert_eq!(saved[0].1["label"], "study-a");
        assert_eq!(saved[1].1["label"], "study-b");
    }
}
