//! Log output.
//!
//! Drains a [`LogStream`] into any `core::fmt::Write` sink other than the
//! console port: the log UART on the board, stderr on the host.
//!
//! # Output format
//!
//! ```text
//! [ timestamp_us] LEVEL: message\r\n
//! ```

use core::fmt::Write;

use crate::logging::{LogEntry, LogStream, SliceWriter};

/// Formatted line capacity (timestamp + level + message + CRLF).
pub const FORMAT_BUF_LEN: usize = 160;

/// Format log entry to bytes.
///
/// Format: `[timestamp_us] LEVEL: message\r\n`
pub fn format_log_entry(entry: &LogEntry, buf: &mut [u8]) -> usize {
    let mut writer = SliceWriter::new(buf);

    let _ = write!(
        writer,
        "[{:10}] {}: {}\r\n",
        entry.timestamp_us,
        entry.level.as_str(),
        core::str::from_utf8(entry.message()).unwrap_or("<invalid utf8>")
    );

    writer.len()
}

/// Drain up to `max` entries into `out`, then report (and reset) the
/// dropped counter if anything was lost.
///
/// Returns the number of entries written. Stops early if the sink fails;
/// the failed entry is lost.
pub fn drain_to<W: Write, const N: usize>(stream: &LogStream<N>, out: &mut W, max: usize) -> usize {
    let mut format_buf = [0u8; FORMAT_BUF_LEN];
    let mut written = 0;

    while written < max {
        let Some(entry) = stream.drain() else {
            break;
        };
        let len = format_log_entry(&entry, &mut format_buf);
        // Truncation may split a code point at the end.
        let text = match core::str::from_utf8(&format_buf[..len]) {
            Ok(s) => s,
            Err(e) => core::str::from_utf8(&format_buf[..e.valid_up_to()]).unwrap_or(""),
        };
        if out.write_str(text).is_err() {
            return written;
        }
        written += 1;
    }

    let dropped = stream.take_dropped();
    if dropped > 0 {
        let _ = write!(out, "[WARN] Dropped: {} log entries\r\n", dropped);
    }

    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;

    fn entry(timestamp_us: i64, level: LogLevel, text: &[u8]) -> LogEntry {
        let mut e = LogEntry::EMPTY;
        e.timestamp_us = timestamp_us;
        e.level = level;
        e.len = text.len() as u8;
        e.msg[..text.len()].copy_from_slice(text);
        e
    }

    #[test]
    fn test_format_log_entry() {
        let entry = entry(1234567, LogLevel::Info, b"Hello world");

        let mut buf = [0u8; 256];
        let len = format_log_entry(&entry, &mut buf);

        let formatted = core::str::from_utf8(&buf[..len]).unwrap();
        assert!(formatted.contains("1234567"));
        assert!(formatted.contains("INFO"));
        assert!(formatted.contains("Hello world"));
        assert!(formatted.ends_with("\r\n"));
    }

    #[test]
    fn test_format_truncated_message() {
        let mut entry = entry(999, LogLevel::Error, b"TEST12345X");
        entry.len = 5; // Only first 5 used

        let mut buf = [0u8; 256];
        let len = format_log_entry(&entry, &mut buf);

        let formatted = core::str::from_utf8(&buf[..len]).unwrap();
        assert!(formatted.contains("ERROR"));
        assert!(formatted.contains("TEST1"));
        assert!(!formatted.contains("X"));
    }

    #[test]
    fn test_drain_to_reports_drops() {
        let stream = LogStream::<2>::new();
        stream.push(1, LogLevel::Warn, b"one");
        stream.push(2, LogLevel::Warn, b"two");
        stream.push(3, LogLevel::Warn, b"three");

        let mut out = String::new();
        assert_eq!(drain_to(&stream, &mut out, usize::MAX), 2);

        assert!(out.contains("WARN: one"));
        assert!(out.contains("WARN: two"));
        assert!(!out.contains("three"));
        assert!(out.contains("Dropped: 1"));
        assert_eq!(stream.dropped(), 0);
    }

    #[test]
    fn test_drain_to_respects_max() {
        let stream = LogStream::<8>::new();
        for i in 0..5 {
            stream.push(i, LogLevel::Info, b"x");
        }

        let mut out = String::new();
        assert_eq!(drain_to(&stream, &mut out, 3), 3);
        assert_eq!(stream.pending(), 2);
    }
}
