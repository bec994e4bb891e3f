//! Linux counter source backed by `/proc/net/dev`.
//!
//! The kernel exposes cumulative per-interface rx/tx byte and packet
//! counters since boot. Interfaces are bucketed by name: cellular modems
//! (`wwan*`, `rmnet*`, `ppp*`) make up the mobile figure, everything except
//! loopback makes up the total.

use crate::counters::CounterSource;
use crate::traffic::CounterSnapshot;
use std::path::PathBuf;

/// Traffic bucket an interface belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceClass {
    /// Loopback, excluded from every bucket.
    Loopback,
    /// Cellular modem interfaces.
    Mobile,
    /// Wireless LAN interfaces.
    Wifi,
    /// Anything else (wired, bridges, tunnels).
    Other,
}

/// Bucket an interface by its kernel name.
pub fn classify_interface(name: &str) -> InterfaceClass {
    if name == "lo" {
        InterfaceClass::Loopback
    } else if name.starts_with("wwan")
        || name.starts_with("rmnet")
        || name.starts_with("ppp")
        || name.starts_with("ccmni")
    {
        InterfaceClass::Mobile
    } else if name.starts_with("wlan") || name.starts_with("wlp") || name.starts_with("wifi") {
        InterfaceClass::Wifi
    } else {
        InterfaceClass::Other
    }
}

/// Counter source reading `/proc/net/dev`.
pub struct ProcfsCounters {
    path: PathBuf,
}

impl ProcfsCounters {
    pub fn new() -> Self {
        Self {
            path: PathBuf::from("/proc/net/dev"),
        }
    }

    /// Read from a different stats file. Used by tests.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Option<Vec<(String, CounterSnapshot)>> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        Some(parse_net_dev(&content))
    }

    fn sum_matching(&self, keep: impl Fn(InterfaceClass) -> bool) -> CounterSnapshot {
        match self.read() {
            Some(interfaces) => interfaces
                .iter()
                .filter(|(name, _)| keep(classify_interface(name)))
                .fold(CounterSnapshot::ZERO, |acc, (_, counters)| acc + *counters),
            // Stats file unreadable on this kernel: report the sentinel and
            // let the accountant degrade instead of erroring out.
            None => CounterSnapshot::UNSUPPORTED,
        }
    }
}

impl Default for ProcfsCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterSource for ProcfsCounters {
    fn total(&self) -> CounterSnapshot {
        self.sum_matching(|class| class != InterfaceClass::Loopback)
    }

    fn mobile(&self) -> CounterSnapshot {
        self.sum_matching(|class| class == InterfaceClass::Mobile)
    }
}

/// Parse the body of `/proc/net/dev` into per-interface counters.
///
/// Layout per data line: `name: rx-bytes rx-packets errs drop fifo frame
/// compressed multicast tx-bytes tx-packets ...`; the two header lines
/// carry no colon-delimited interface name and are skipped.
fn parse_net_dev(content: &str) -> Vec<(String, CounterSnapshot)> {
    content
        .lines()
        .filter_map(|line| {
            let (name, rest) = line.split_once(':')?;
            let fields: Vec<i64> = rest
                .split_whitespace()
                .map(|f| f.parse().unwrap_or(0))
                .collect();
            if fields.len() < 10 {
                return None;
            }
            Some((
                name.trim().to_string(),
                CounterSnapshot::new(fields[0], fields[1], fields[8], fields[9]),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo:    9000      90    0    0    0     0          0         0     9000      90    0    0    0     0       0          0
  eth0:    4000      40    0    0    0     0          0         0     1500      15    0    0    0     0       0          0
 wlan0:    2000      20    0    0    0     0          0         0      700       7    0    0    0     0       0          0
 wwan0:    1000      10    0    0    0     0          0         0      500       5    0    0    0     0       0          0
";

    #[test]
    fn test_parse_net_dev() {
        let interfaces = parse_net_dev(SAMPLE);
        assert_eq!(interfaces.len(), 4);

        let (name, counters) = &interfaces[3];
        assert_eq!(name, "wwan0");
        assert_eq!(*counters, CounterSnapshot::new(1000, 10, 500, 5));
    }

    #[test]
    fn test_classify_interface() {
        assert_eq!(classify_interface("lo"), InterfaceClass::Loopback);
        assert_eq!(classify_interface("wwan0"), InterfaceClass::Mobile);
        assert_eq!(classify_interface("rmnet_data0"), InterfaceClass::Mobile);
        assert_eq!(classify_interface("ppp0"), InterfaceClass::Mobile);
        assert_eq!(classify_interface("wlan0"), InterfaceClass::Wifi);
        assert_eq!(classify_interface("wlp3s0"), InterfaceClass::Wifi);
        assert_eq!(classify_interface("eth0"), InterfaceClass::Other);
    }

    #[test]
    fn test_totals_exclude_loopback() {
        let path = std::env::temp_dir().join(format!("net-dev-{}", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{SAMPLE}").unwrap();

        let source = ProcfsCounters::with_path(&path);

        // eth0 + wlan0 + wwan0, no lo.
        assert_eq!(source.total(), CounterSnapshot::new(7000, 70, 2700, 27));
        assert_eq!(source.mobile(), CounterSnapshot::new(1000, 10, 500, 5));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_stats_file_is_unsupported() {
        let source = ProcfsCounters::with_path("/definitely/not/a/real/path");
        assert!(source.total().is_unsupported());
        assert!(source.mobile().is_unsupported());
    }
}
