//! Console statistics.
//!
//! Every failure in the console degrades to lost data or a returned
//! status, never a halt. These counters make the silent ones visible.

use core::fmt;

/// Snapshot of console counters at a point in time.
///
/// All counters run since boot and wrap at `u32::MAX`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConsoleStats {
    /// RX bytes dropped because the ingest queue was full.
    pub rx_dropped: u32,
    /// RX re-arm calls the UART refused.
    pub rx_rearm_errors: u32,
    /// Printable bytes dropped because the line was full.
    pub line_dropped: u32,
    /// Non-empty lines handed to the line handler.
    pub lines_dispatched: u32,
    /// Transmissions started.
    pub tx_started: u32,
    /// Transmit requests that timed out waiting for the previous one.
    pub tx_timeouts: u32,
    /// Transmit requests the UART refused to start.
    pub tx_errors: u32,
}

impl ConsoleStats {
    /// Whether any data has been lost or refused.
    pub fn has_losses(&self) -> bool {
        self.rx_dropped != 0
            || self.rx_rearm_errors != 0
            || self.line_dropped != 0
            || self.tx_timeouts != 0
            || self.tx_errors != 0
    }
}

impl fmt::Display for ConsoleStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rx_dropped={} rx_rearm_errors={} line_dropped={} lines={} tx={} tx_timeouts={} tx_errors={}",
            self.rx_dropped,
            self.rx_rearm_errors,
            self.line_dropped,
            self.lines_dispatched,
            self.tx_started,
            self.tx_timeouts,
            self.tx_errors,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_losses() {
        let stats = ConsoleStats::default();
        assert!(!stats.has_losses());
    }

    #[test]
    fn test_dispatch_is_not_a_loss() {
        let stats = ConsoleStats {
            lines_dispatched: 3,
            tx_started: 9,
            ..ConsoleStats::default()
        };
        assert!(!stats.has_losses());

        let stats = ConsoleStats { tx_timeouts: 1, ..stats };
        assert!(stats.has_losses());
    }

    #[test]
    fn test_display() {
        let stats = ConsoleStats {
            rx_dropped: 2,
            lines_dispatched: 1,
            ..ConsoleStats::default()
        };
        let text = format!("{}", stats);
        assert!(text.starts_with("rx_dropped=2 "));
        assert!(text.contains("lines=1"));
    }
}
