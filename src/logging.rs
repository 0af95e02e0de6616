//! Non-blocking logging for RustSerialConsole.
//!
//! # Architecture
//!
//! ```text
//! Poll loop              LogStream            Drain
//! ─────────              ─────────            ─────
//!
//! console_log!() ─────▶ [L0][L1][L2] ──────▶ fmt::Write sink
//! ~100ns                  lock-free           (UART, stderr)
//! non-blocking            ring buffer
//! ```
//!
//! # Rules
//!
//! - Logging never blocks and never goes through the console transmitter
//! - One producer context per stream, one drain
//! - Messages are dropped (and counted) when the ring is full
//! - Messages above the stream level are discarded before formatting cost

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};

/// Maximum message length.
pub const MAX_MSG_LEN: usize = 120;

/// Log buffer size (number of entries).
pub const LOG_BUFFER_SIZE: usize = 64;

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl LogLevel {
    /// Convert to string for output.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }

    /// Convert from raw u8 value (saturating at Trace).
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Error,
            1 => LogLevel::Warn,
            2 => LogLevel::Info,
            3 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

/// A single log entry.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct LogEntry {
    /// Timestamp in microseconds.
    pub timestamp_us: i64,
    /// Log level.
    pub level: LogLevel,
    /// Message length.
    pub len: u8,
    /// Message bytes (not null-terminated).
    pub msg: [u8; MAX_MSG_LEN],
}

impl LogEntry {
    pub const EMPTY: Self = Self {
        timestamp_us: 0,
        level: LogLevel::Info,
        len: 0,
        msg: [0; MAX_MSG_LEN],
    };

    /// Message bytes.
    pub fn message(&self) -> &[u8] {
        &self.msg[..self.len as usize]
    }
}

impl Default for LogEntry {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Lock-free SPSC log stream.
pub struct LogStream<const N: usize = LOG_BUFFER_SIZE> {
    entries: UnsafeCell<[LogEntry; N]>,
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
    level: AtomicU8,
}

// SAFETY: Single producer writes only unpublished slots, single consumer
// reads only published ones. Coordination through write_idx/read_idx.
unsafe impl<const N: usize> Sync for LogStream<N> {}
unsafe impl<const N: usize> Send for LogStream<N> {}

impl<const N: usize> LogStream<N> {
    const MASK: usize = N - 1;

    /// Create a new empty log stream (level Info).
    pub const fn new() -> Self {
        const { assert!(N.is_power_of_two(), "Log buffer size must be power of 2") };

        Self {
            entries: UnsafeCell::new([LogEntry::EMPTY; N]),
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
            level: AtomicU8::new(LogLevel::Info as u8),
        }
    }

    /// Most verbose level still recorded.
    #[inline]
    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    /// Whether a message at `level` would be recorded.
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level <= self.level()
    }

    /// Push a log entry (never blocks).
    ///
    /// Returns `true` if message was queued, `false` if filtered by level
    /// or dropped (ring full).
    ///
    /// # Timing
    ///
    /// Completes in O(1), typically < 200ns.
    ///
    /// # Safety
    ///
    /// Not marked `unsafe`, but each stream has exactly one producer context.
    /// Logging to the same stream from the ISR and the poll loop races on the
    /// write slot; give the ISR its own stream instead.
    #[inline]
    pub fn push(&self, timestamp_us: i64, level: LogLevel, msg: &[u8]) -> bool {
        if !self.enabled(level) {
            return false;
        }

        let write = self.write_idx.load(Ordering::Relaxed);
        let read = self.read_idx.load(Ordering::Acquire);

        if write.wrapping_sub(read) >= N as u32 {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        let idx = (write as usize) & Self::MASK;

        // SAFETY: Single producer; slot `idx` is not visible to the consumer
        // until write_idx is published below.
        unsafe {
            let entry = &mut *self.entries.get().cast::<LogEntry>().add(idx);
            entry.timestamp_us = timestamp_us;
            entry.level = level;
            entry.len = msg.len().min(MAX_MSG_LEN) as u8;
            entry.msg[..entry.len as usize].copy_from_slice(&msg[..entry.len as usize]);
        }

        self.write_idx.store(write.wrapping_add(1), Ordering::Release);
        true
    }

    /// Drain next log entry.
    ///
    /// Returns `None` if no entries available.
    ///
    /// # Safety
    ///
    /// Not marked `unsafe`, but only one context may drain a stream.
    #[inline]
    pub fn drain(&self) -> Option<LogEntry> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);

        if read == write {
            return None;
        }

        let idx = (read as usize) & Self::MASK;

        // SAFETY: Single consumer, slot published by the producer
        let entry = unsafe { self.entries.get().cast::<LogEntry>().add(idx).read() };

        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(entry)
    }

    /// Get count of dropped messages.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Take and reset the dropped counter (e.g., after reporting).
    #[inline]
    pub fn take_dropped(&self) -> u32 {
        self.dropped.swap(0, Ordering::Relaxed)
    }

    /// Check if there are entries to drain.
    #[inline]
    pub fn has_entries(&self) -> bool {
        self.pending() != 0
    }

    /// Get number of entries waiting to be drained.
    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }
}

impl<const N: usize> Default for LogStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// `fmt::Write` over a byte slice; output past the end is truncated.
pub(crate) struct SliceWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> SliceWriter<'a> {
    pub(crate) fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub(crate) fn len(&self) -> usize {
        self.pos
    }
}

impl core::fmt::Write for SliceWriter<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let bytes = s.as_bytes();
        let remaining = self.buf.len() - self.pos;
        let to_write = bytes.len().min(remaining);
        self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
        self.pos += to_write;
        Ok(())
    }
}

/// Format a message into a buffer.
///
/// Returns the number of bytes written.
#[inline]
pub fn format_to_buffer(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    let mut writer = SliceWriter::new(buf);
    let _ = core::fmt::write(&mut writer, args);
    writer.len()
}

/// Non-blocking log macro.
///
/// # Example
///
/// ```ignore
/// console_log!(LogLevel::Info, CONSOLE_LOG_STREAM, timestamp, "line {} bytes", len);
/// ```
#[macro_export]
macro_rules! console_log {
    ($level:expr, $stream:expr, $timestamp:expr, $($arg:tt)*) => {{
        let level = $level;
        if $stream.enabled(level) {
            let mut buf = [0u8; $crate::logging::MAX_MSG_LEN];
            let len = $crate::logging::format_to_buffer(&mut buf, format_args!($($arg)*));
            $stream.push($timestamp, level, &buf[..len]);
        }
    }};
}

/// Info log.
#[macro_export]
macro_rules! console_info {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::console_log!($crate::logging::LogLevel::Info, $stream, $timestamp, $($arg)*)
    };
}

/// Warning log.
#[macro_export]
macro_rules! console_warn {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::console_log!($crate::logging::LogLevel::Warn, $stream, $timestamp, $($arg)*)
    };
}

/// Error log.
#[macro_export]
macro_rules! console_error {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::console_log!($crate::logging::LogLevel::Error, $stream, $timestamp, $($arg)*)
    };
}

/// Debug log.
#[macro_export]
macro_rules! console_debug {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::console_log!($crate::logging::LogLevel::Debug, $stream, $timestamp, $($arg)*)
    };
}

/// Trace log (maximum verbosity).
#[macro_export]
macro_rules! console_trace {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::console_log!($crate::logging::LogLevel::Trace, $stream, $timestamp, $($arg)*)
    };
}
