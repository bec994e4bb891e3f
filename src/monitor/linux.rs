//! Linux link monitor backed by sysfs and procfs.
//!
//! A scan thread samples `/sys/class/net` for Wi-Fi and mobile interface
//! state, `/sys/class/rfkill` for bluetooth, GPS, WiMAX, and airplane
//! mode, and `/proc/net/route` for internet reachability. Observed
//! transitions are pushed as [`MonitorEvent`]s; data-activity signals are
//! derived from movement of the cumulative traffic counters between scans.
//!
//! Kinds the running kernel does not expose (no rfkill switch, no modem
//! interface) are simply never reported.

use crate::counters::{classify_interface, CounterSource, InterfaceClass, ProcfsCounters};
use crate::monitor::types::{DataActivity, LinkChange, LinkKind, LinkState, MonitorEvent};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Configuration for the scan thread.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Interval between state scans
    pub scan_interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            scan_interval: Duration::from_secs(1),
        }
    }
}

/// Errors that can occur while running the monitor.
#[derive(Debug)]
pub enum MonitorError {
    AlreadyRunning,
}

impl std::fmt::Display for MonitorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MonitorError::AlreadyRunning => write!(f, "Monitor is already running"),
        }
    }
}

impl std::error::Error for MonitorError {}

/// Whether this kernel exposes the interfaces the monitor reads.
pub fn check_support() -> bool {
    Path::new("/sys/class/net").is_dir()
}

/// The Linux link monitor.
pub struct LinuxMonitor {
    config: MonitorConfig,
    sender: Sender<MonitorEvent>,
    receiver: Receiver<MonitorEvent>,
    running: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<()>>,
}

impl LinuxMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        // Bounded so a stalled consumer cannot grow memory without limit
        let (sender, receiver) = bounded(10_000);

        Self {
            config,
            sender,
            receiver,
            running: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
        }
    }

    /// Start scanning in a background thread.
    pub fn start(&mut self) -> Result<(), MonitorError> {
        if self.running.load(Ordering::SeqCst) {
            return Err(MonitorError::AlreadyRunning);
        }

        self.running.store(true, Ordering::SeqCst);

        let sender = self.sender.clone();
        let running = self.running.clone();
        let interval = self.config.scan_interval;

        let handle = thread::spawn(move || {
            scan_loop(sender, running, interval);
        });

        self.thread_handle = Some(handle);
        Ok(())
    }

    /// Stop scanning.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            // The thread exits once running becomes false
            let _ = handle.join();
        }
    }

    /// Check if the monitor is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Get the receiver for monitor events.
    pub fn receiver(&self) -> &Receiver<MonitorEvent> {
        &self.receiver
    }

    /// Try to receive an event without blocking.
    pub fn try_recv(&self) -> Option<MonitorEvent> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for LinuxMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

fn scan_loop(sender: Sender<MonitorEvent>, running: Arc<AtomicBool>, interval: Duration) {
    let counters = ProcfsCounters::new();
    let mut links: HashMap<LinkKind, LinkState> = HashMap::new();
    let mut last_internet: Option<(bool, Option<LinkKind>)> = None;
    let mut last_total = counters.total();
    let mut last_activity = DataActivity::None;

    while running.load(Ordering::SeqCst) {
        let interfaces = read_interface_states(Path::new("/sys/class/net"));
        let switches = read_rfkill_switches(Path::new("/sys/class/rfkill"));

        // The first scan seeds consumers with one transition per observed
        // kind; after that only real changes are pushed.
        for (kind, state) in link_states(&interfaces, &switches) {
            if links.get(&kind) != Some(&state) {
                links.insert(kind, state);
                let _ = sender.try_send(MonitorEvent::Link(LinkChange::new(kind, state)));
            }
        }

        let internet = std::fs::read_to_string("/proc/net/route")
            .map(|content| route_reachability(&content))
            .unwrap_or((false, None));
        if last_internet != Some(internet) {
            last_internet = Some(internet);
            let (reachable, via) = internet;
            let _ = sender.try_send(MonitorEvent::Internet { reachable, via });
        }

        let total = counters.total();
        if !total.is_unsupported() && !last_total.is_unsupported() {
            let moved = total - last_total;
            let activity = DataActivity::from_deltas(moved.rx_bytes > 0, moved.tx_bytes > 0);
            // Signal while traffic flows, and once more when it stops.
            if !activity.is_idle() || activity != last_activity {
                let _ = sender.try_send(MonitorEvent::Activity(activity));
            }
            last_activity = activity;
        }
        last_total = total;

        thread::sleep(interval);
    }
}

/// Interface names and whether their operstate reports `up`.
fn read_interface_states(root: &Path) -> Vec<(String, bool)> {
    let Ok(entries) = std::fs::read_dir(root) else {
        return Vec::new();
    };

    entries
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let name = entry.file_name().into_string().ok()?;
            let operstate = std::fs::read_to_string(entry.path().join("operstate")).ok()?;
            Some((name, operstate.trim() == "up"))
        })
        .collect()
}

/// rfkill switch types and whether they are soft- or hard-blocked.
fn read_rfkill_switches(root: &Path) -> Vec<(String, bool)> {
    let Ok(entries) = std::fs::read_dir(root) else {
        return Vec::new();
    };

    entries
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let kind = std::fs::read_to_string(entry.path().join("type")).ok()?;
            let soft = std::fs::read_to_string(entry.path().join("soft")).unwrap_or_default();
            let hard = std::fs::read_to_string(entry.path().join("hard")).unwrap_or_default();
            let blocked = soft.trim() == "1" || hard.trim() == "1";
            Some((kind.trim().to_string(), blocked))
        })
        .collect()
}

/// Current state of every link kind this host can report on.
///
/// Wi-Fi and mobile come from interface operstate, bluetooth/GPS/WiMAX
/// from their rfkill switches, airplane mode from every switch being
/// blocked at once.
fn link_states(interfaces: &[(String, bool)], switches: &[(String, bool)]) -> Vec<(LinkKind, LinkState)> {
    let mut states = Vec::new();

    for (class, kind) in [
        (InterfaceClass::Wifi, LinkKind::Wifi),
        (InterfaceClass::Mobile, LinkKind::Mobile),
    ] {
        let mut seen = false;
        let mut up = false;
        for (name, if_up) in interfaces {
            if classify_interface(name) == class {
                seen = true;
                up |= if_up;
            }
        }
        if seen {
            states.push((kind, LinkState::from_up(up)));
        }
    }

    for (switch_type, kind) in [
        ("bluetooth", LinkKind::Bluetooth),
        ("gps", LinkKind::Gps),
        ("wimax", LinkKind::Wimax),
    ] {
        let mut seen = false;
        let mut unblocked = false;
        for (ty, blocked) in switches {
            if ty == switch_type {
                seen = true;
                unblocked |= !blocked;
            }
        }
        if seen {
            states.push((kind, LinkState::from_up(unblocked)));
        }
    }

    if !switches.is_empty() {
        let all_blocked = switches.iter().all(|(_, blocked)| *blocked);
        states.push((LinkKind::Airplane, LinkState::from_up(all_blocked)));
    }

    states
}

/// Internet reachability from the body of `/proc/net/route`.
///
/// A default route (destination `00000000`) means reachable; the carrying
/// kind is reported when the route's interface classifies as a watched
/// radio, `None` for wired or unknown interfaces.
fn route_reachability(content: &str) -> (bool, Option<LinkKind>) {
    for line in content.lines().skip(1) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 2 || fields[1] != "00000000" {
            continue;
        }
        let via = match classify_interface(fields[0]) {
            InterfaceClass::Wifi => Some(LinkKind::Wifi),
            InterfaceClass::Mobile => Some(LinkKind::Mobile),
            InterfaceClass::Loopback | InterfaceClass::Other => None,
        };
        return (true, via);
    }
    (false, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(name: &str, flag: bool) -> (String, bool) {
        (name.to_string(), flag)
    }

    #[test]
    fn test_link_states_from_interfaces() {
        let interfaces = vec![s("lo", true), s("wlan0", true), s("wwan0", false)];
        let states = link_states(&interfaces, &[]);

        assert!(states.contains(&(LinkKind::Wifi, LinkState::On)));
        assert!(states.contains(&(LinkKind::Mobile, LinkState::Off)));
        // No rfkill switches: nothing reported for the rfkill-backed kinds.
        assert_eq!(states.len(), 2);
    }

    #[test]
    fn test_link_states_from_rfkill() {
        let switches = vec![s("wlan", false), s("bluetooth", true), s("gps", false)];
        let states = link_states(&[], &switches);

        assert!(states.contains(&(LinkKind::Bluetooth, LinkState::Off)));
        assert!(states.contains(&(LinkKind::Gps, LinkState::On)));
        assert!(states.contains(&(LinkKind::Airplane, LinkState::Off)));
    }

    #[test]
    fn test_airplane_mode_is_every_switch_blocked() {
        let switches = vec![s("wlan", true), s("bluetooth", true), s("wwan", true)];
        let states = link_states(&[], &switches);

        assert!(states.contains(&(LinkKind::Airplane, LinkState::On)));
    }

    #[test]
    fn test_unreported_kinds_are_absent() {
        let states = link_states(&[s("eth0", true)], &[]);
        assert!(states.is_empty());
    }

    #[test]
    fn test_route_reachability() {
        let table = "Iface\tDestination\tGateway\tFlags\tRefCnt\tUse\tMetric\tMask\tMTU\tWindow\tIRTT\n\
                     wlan0\t00000000\t0101A8C0\t0003\t0\t0\t100\t00000000\t0\t0\t0\n\
                     wlan0\t0001A8C0\t00000000\t0001\t0\t0\t100\t00FFFFFF\t0\t0\t0\n";
        assert_eq!(route_reachability(table), (true, Some(LinkKind::Wifi)));
    }

    #[test]
    fn test_wired_route_is_reachable_but_unattributed() {
        let table = "Iface\tDestination\tGateway\tFlags\tRefCnt\tUse\tMetric\tMask\tMTU\tWindow\tIRTT\n\
                     eth0\t00000000\t0101A8C0\t0003\t0\t0\t100\t00000000\t0\t0\t0\n";
        assert_eq!(route_reachability(table), (true, None));
    }

    #[test]
    fn test_no_default_route_is_unreachable() {
        let table = "Iface\tDestination\tGateway\tFlags\tRefCnt\tUse\tMetric\tMask\tMTU\tWindow\tIRTT\n\
                     wlan0\t0001A8C0\t00000000\t0001\t0\t0\t100\t00FFFFFF\t0\t0\t0\n";
        assert_eq!(route_reachability(table), (false, None));
    }
}
