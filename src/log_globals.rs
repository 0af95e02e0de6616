//! Global log stream instance.
//!
//! Single producer (console poll loop), single consumer (log drain).

use crate::logging::LogStream;

/// Console log stream.
///
/// Written by `Console::process_pending` and friends, drained by
/// `Console::drain_logs` into the board's log port.
pub static CONSOLE_LOG_STREAM: LogStream = LogStream::new();
