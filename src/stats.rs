//! Session statistics for the connectivity sensor.
//!
//! Tracks how much the sensor has observed and recorded, for the `status`
//! command and the end-of-session summary. Counters are atomics so the
//! sensor loop and any reporting thread can share one instance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Statistics for the current session.
#[derive(Debug)]
pub struct SessionStats {
    /// Number of link transitions observed
    link_events: AtomicU64,
    /// Number of internet reachability changes
    internet_changes: AtomicU64,
    /// Number of data-activity polls processed
    traffic_polls: AtomicU64,
    /// Number of usage samples emitted
    usage_samples: AtomicU64,
    /// Number of idle signals
    idle_signals: AtomicU64,
    /// Session start time
    session_start: DateTime<Utc>,
    /// Path for persisting stats
    persist_path: Option<PathBuf>,
}

impl SessionStats {
    /// Create new session statistics.
    pub fn new() -> Self {
        Self {
            link_events: AtomicU64::new(0),
            internet_changes: AtomicU64::new(0),
            traffic_polls: AtomicU64::new(0),
            usage_samples: AtomicU64::new(0),
            idle_signals: AtomicU64::new(0),
            session_start: Utc::now(),
            persist_path: None,
        }
    }

    /// Create session statistics with persistence.
    pub fn with_persistence(path: PathBuf) -> Self {
        let mut stats = Self::new();
        stats.persist_path = Some(path);

        // Try to load stats carried over from previous sessions
        if let Err(e) = stats.load() {
            tracing::debug!("no previous session stats loaded: {e}");
        }

        stats
    }

    /// Record an observed link transition.
    pub fn record_link_event(&self) {
        self.link_events.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an internet reachability change.
    pub fn record_internet_change(&self) {
        self.internet_changes.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a processed data-activity poll.
    pub fn record_traffic_poll(&self) {
        self.traffic_polls.fetch_add(1, Ordering::Relaxed);
    }

    /// Record emitted usage samples.
    pub fn record_usage_samples(&self, count: u64) {
        self.usage_samples.fetch_add(count, Ordering::Relaxed);
    }

    /// Record an idle signal.
    pub fn record_idle_signal(&self) {
        self.idle_signals.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current statistics.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            link_events: self.link_events.load(Ordering::Relaxed),
            internet_changes: self.internet_changes.load(Ordering::Relaxed),
            traffic_polls: self.traffic_polls.load(Ordering::Relaxed),
            usage_samples: self.usage_samples.load(Ordering::Relaxed),
            idle_signals: self.idle_signals.load(Ordering::Relaxed),
            session_start: self.session_start,
            session_duration_secs: (Utc::now() - self.session_start).num_seconds() as u64,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let stats = self.snapshot();
        format!(
            "Session Statistics:\n\
             - Link transitions observed: {}\n\
             - Internet reachability changes: {}\n\
             - Traffic polls processed: {}\n\
             - Usage samples emitted: {}\n\
             - Idle signals: {}\n\
             - Session duration: {} seconds",
            stats.link_events,
            stats.internet_changes,
            stats.traffic_polls,
            stats.usage_samples,
            stats.idle_signals,
            stats.session_duration_secs
        )
    }

    /// Save stats to disk.
    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let stats = self.snapshot();
            let persisted = PersistedStats {
                link_events: stats.link_events,
                internet_changes: stats.internet_changes,
                traffic_polls: stats.traffic_polls,
                usage_samples: stats.usage_samples,
                idle_signals: stats.idle_signals,
                last_updated: Utc::now(),
            };

            let json = serde_json::to_string_pretty(&persisted).map_err(std::io::Error::other)?;

            std::fs::write(path, json)?;
        }
        Ok(())
    }

    /// Load stats from disk.
    fn load(&mut self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let persisted: PersistedStats =
                    serde_json::from_str(&content).map_err(std::io::Error::other)?;

                self.link_events
                    .store(persisted.link_events, Ordering::Relaxed);
                self.internet_changes
                    .store(persisted.internet_changes, Ordering::Relaxed);
                self.traffic_polls
                    .store(persisted.traffic_polls, Ordering::Relaxed);
                self.usage_samples
                    .store(persisted.usage_samples, Ordering::Relaxed);
                self.idle_signals
                    .store(persisted.idle_signals, Ordering::Relaxed);
            }
        }
        Ok(())
    }

    /// Reset all counters.
    pub fn reset(&self) {
        self.link_events.store(0, Ordering::Relaxed);
        self.internet_changes.store(0, Ordering::Relaxed);
        self.traffic_polls.store(0, Ordering::Relaxed);
        self.usage_samples.store(0, Ordering::Relaxed);
        self.idle_signals.store(0, Ordering::Relaxed);
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of session statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub link_events: u64,
    pub internet_changes: u64,
    pub traffic_polls: u64,
    pub usage_samples: u64,
    pub idle_signals: u64,
    pub session_start: DateTime<Utc>,
    pub session_duration_secs: u64,
}

/// Stats format for persistence.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedStats {
    link_events: u64,
    internet_changes: u64,
    traffic_polls: u64,
    usage_samples: u64,
    idle_signals: u64,
    last_updated: DateTime<Utc>,
}

/// Thread-safe shared session statistics.
pub type SharedSessionStats = Arc<SessionStats>;

/// Create new shared session statistics.
pub fn create_shared_stats() -> SharedSessionStats {
    Arc::new(SessionStats::new())
}

/// Create new shared session statistics with persistence.
pub fn create_shared_stats_with_persistence(path: PathBuf) -> SharedSessionStats {
    Arc::new(SessionStats::with_persistence(path))
}
