//! Non-Linux (noop) link monitor.
//!
//! This exists so the crate (and binary) can compile on targets without
//! sysfs. It never emits events; the sensor keeps running without link
//! watching, mirroring the degraded traffic-accounting path.

use crate::monitor::types::MonitorEvent;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Configuration for the scan thread.
///
/// Accepted on all platforms; the noop monitor never scans.
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

/// Link watching is not supported on this target.
pub fn check_support() -> bool {
    false
}

/// A noop monitor that never emits events.
pub struct NoopMonitor {
    _config: MonitorConfig,
    _sender: Sender<MonitorEvent>,
    receiver: Receiver<MonitorEvent>,
    running: Arc<AtomicBool>,
}

impl NoopMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        let (sender, receiver) = bounded(10_000);
        Self {
            _config: config,
            _sender: sender,
            receiver,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start the monitor. On non-Linux targets this simply marks it as
    /// running.
    pub fn start(&mut self) -> Result<(), MonitorError> {
        if self.running.load(Ordering::SeqCst) {
            return Err(MonitorError::AlreadyRunning);
        }
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Stop the monitor.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
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
