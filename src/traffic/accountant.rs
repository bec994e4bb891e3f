//! Traffic delta accounting.
//!
//! Converts cumulative radio counters into per-interval usage samples. The
//! platform counter source exposes only the device total and the mobile
//! radio directly; Wi-Fi figures are derived as total minus mobile.
//!
//! The accountant holds one baseline per radio class. Each poll subtracts
//! the baselines from the current readings, emits the two deltas, and
//! replaces the baselines with the current readings. Baseline replacement
//! is final: deltas are never re-derived retroactively.

use crate::monitor::types::DataActivity;
use crate::records::{Identity, RadioClass, UsageSample};
use crate::traffic::CounterSnapshot;

/// Per-session traffic accounting state.
///
/// Created when the sensor starts and dropped when it stops; each session
/// re-baselines from the then-current cumulative counters, so the first
/// poll's deltas cover only traffic since activation, not device boot.
#[derive(Debug)]
pub struct TrafficAccountant {
    /// Cumulative totals captured at creation, used only to derive the
    /// initial Wi-Fi baseline
    start_total: CounterSnapshot,
    /// Last observed cumulative mobile counters
    mobile_baseline: CounterSnapshot,
    /// Last observed cumulative Wi-Fi counters (total minus mobile)
    wifi_baseline: CounterSnapshot,
    armed: bool,
    degraded: bool,
}

/// What a poll produced.
#[derive(Debug, Clone)]
pub enum PollOutcome {
    /// Activity was `None`: nothing was read, nothing changed.
    Idle,
    /// The accountant is not armed, either because `activate` was never
    /// called or because the platform cannot account traffic.
    Skipped,
    /// One usage sample per radio class, Wi-Fi first.
    Samples {
        wifi: UsageSample,
        mobile: UsageSample,
    },
}

impl TrafficAccountant {
    /// Capture the creation-time totals. Baselines stay at their zero
    /// default until [`activate`](Self::activate) arms polling.
    pub fn new(start_total: CounterSnapshot) -> Self {
        Self {
            start_total,
            mobile_baseline: CounterSnapshot::ZERO,
            wifi_baseline: CounterSnapshot::ZERO,
            armed: false,
            degraded: false,
        }
    }

    /// Arm polling, initializing any baseline still at its zero default.
    ///
    /// Returns `false` when the creation-time totals carried the
    /// unsupported sentinel; the accountant then stays degraded for the
    /// rest of the session and every poll is skipped. Calling `activate`
    /// again never resets a baseline that is already initialized.
    pub fn activate(&mut self, current_mobile: CounterSnapshot) -> bool {
        if self.start_total.is_unsupported() {
            if !self.degraded {
                tracing::warn!("traffic statistics unsupported; usage accounting disabled");
                self.degraded = true;
            }
            return false;
        }

        if self.mobile_baseline.is_zero() {
            self.mobile_baseline = current_mobile;
        }
        if self.wifi_baseline.is_zero() {
            self.wifi_baseline = self.start_total - self.mobile_baseline;
        }
        self.armed = true;
        true
    }

    /// Account one data-activity signal.
    ///
    /// An idle signal reads no counters and mutates no state. Otherwise the
    /// deltas since the previous poll are emitted (Wi-Fi first, then
    /// mobile) and both baselines advance to the current readings.
    pub fn poll(
        &mut self,
        activity: DataActivity,
        current_mobile: CounterSnapshot,
        current_total: CounterSnapshot,
        identity: &Identity,
    ) -> PollOutcome {
        if activity.is_idle() {
            return PollOutcome::Idle;
        }
        if !self.armed {
            return PollOutcome::Skipped;
        }

        let current_wifi = current_total - current_mobile;
        let delta_mobile = current_mobile - self.mobile_baseline;
        let delta_wifi = current_wifi - self.wifi_baseline;

        let wifi = UsageSample::new(RadioClass::Wifi, delta_wifi, identity);
        let mobile = UsageSample::new(RadioClass::Mobile, delta_mobile, identity);

        self.mobile_baseline = current_mobile;
        self.wifi_baseline = current_wifi;

        PollOutcome::Samples { wifi, mobile }
    }

    /// Whether polling is armed.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Whether the platform reported traffic statistics as unavailable.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// The mobile baseline as of the last poll.
    pub fn mobile_baseline(&self) -> CounterSnapshot {
        self.mobile_baseline
    }

    /// The Wi-Fi baseline as of the last poll.
    pub fn wifi_baseline(&self) -> CounterSnapshot {
        self.wifi_baseline
    }
}
