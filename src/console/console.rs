//! Main console struct integrating all components
//!
//! Split along the interrupt boundary:
//! - [`ConsoleContext`] is the `static` shared with the RX and TX interrupts
//! - [`Console`] lives in the poll loop and owns everything else

use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};

use super::editor::{EditOutcome, LineEditor};
use super::handler::LineHandler;
use crate::config::{EditorConfig, LINE_BUFFER_SIZE, RX_BUFFER_SIZE, TX_BUFFER_SIZE};
use crate::error::TxError;
use crate::hal::{Clock, HwError, UartRx, UartTx};
use crate::ingest::{ByteIngestQueue, PushOutcome};
use crate::log_drain::drain_to;
use crate::log_globals::CONSOLE_LOG_STREAM;
use crate::logging::LogStream;
use crate::stats::ConsoleStats;
use crate::transmit::{AsyncTransmitter, TxChannel};
use crate::{console_debug, console_error, console_info, console_warn};

/// Version string (set by build.rs, includes git hash)
pub const VERSION: &str = env!("VERSION_STRING");

/// Interrupt-shared console state.
///
/// Place it in a `static` and call [`init`](Self::init) before enabling the
/// UART interrupts. All fields crossing the interrupt boundary are atomics
/// or guarded by atomics; never read them through plain copies.
pub struct ConsoleContext<const RX: usize = RX_BUFFER_SIZE, const TX: usize = TX_BUFFER_SIZE> {
    rx_queue: ByteIngestQueue<RX>,
    tx_channel: TxChannel<TX>,
    rx_rearm_errors: AtomicU32,
}

impl<const RX: usize, const TX: usize> ConsoleContext<RX, TX> {
    pub const fn new() -> Self {
        Self {
            rx_queue: ByteIngestQueue::new(),
            tx_channel: TxChannel::new(),
            rx_rearm_errors: AtomicU32::new(0),
        }
    }

    /// Arm the first single-byte receive.
    ///
    /// Must run once, before interrupts are enabled.
    pub fn init<R: UartRx + ?Sized>(&self, rx: &mut R) -> Result<(), HwError> {
        rx.arm_receive()
    }

    /// RX-complete handler (interrupt context).
    ///
    /// Queues `byte` and re-arms the next receive. Nothing is surfaced on
    /// failure: a full queue drops the byte, a refused re-arm is counted.
    #[inline]
    pub fn ingest_byte<R: UartRx + ?Sized>(&self, byte: u8, rx: &mut R) -> PushOutcome {
        let outcome = self.rx_queue.push(byte);
        if rx.arm_receive().is_err() {
            self.rx_rearm_errors.fetch_add(1, Ordering::Relaxed);
        }
        outcome
    }

    /// TX-complete handler (interrupt context).
    #[inline]
    pub fn on_transmit_complete(&self) {
        self.tx_channel.on_transmit_complete();
    }

    /// Non-blocking busy query.
    #[inline]
    pub fn is_busy(&self) -> bool {
        self.tx_channel.is_busy()
    }

    pub fn rx_queue(&self) -> &ByteIngestQueue<RX> {
        &self.rx_queue
    }

    pub fn tx_channel(&self) -> &TxChannel<TX> {
        &self.tx_channel
    }

    pub fn rx_rearm_errors(&self) -> u32 {
        self.rx_rearm_errors.load(Ordering::Relaxed)
    }
}

impl<const RX: usize, const TX: usize> Default for ConsoleContext<RX, TX> {
    fn default() -> Self {
        Self::new()
    }
}

/// Poll-loop side of the console.
pub struct Console<
    U,
    C,
    H,
    const LINE: usize = LINE_BUFFER_SIZE,
    const RX: usize = RX_BUFFER_SIZE,
    const TX: usize = TX_BUFFER_SIZE,
> {
    ctx: &'static ConsoleContext<RX, TX>,
    editor: LineEditor<LINE>,
    tx: AsyncTransmitter<U, C, TX>,
    handler: H,
    log: &'static LogStream,
    /// Counters as of the last loss report
    reported: ConsoleStats,
}

impl<U, C, H, const LINE: usize, const RX: usize, const TX: usize> Console<U, C, H, LINE, RX, TX>
where
    U: UartTx,
    C: Clock,
    H: LineHandler,
{
    /// Create new console
    pub fn new(ctx: &'static ConsoleContext<RX, TX>, uart: U, clock: C, handler: H) -> Self {
        Self {
            ctx,
            editor: LineEditor::new(),
            tx: AsyncTransmitter::new(&ctx.tx_channel, uart, clock),
            handler,
            log: &CONSOLE_LOG_STREAM,
            reported: ConsoleStats::default(),
        }
    }

    /// Replace the editor configuration (before any input is processed).
    pub fn with_editor_config(mut self, config: EditorConfig) -> Self {
        self.editor = LineEditor::with_config(config);
        self
    }

    /// Override the transmit timeout.
    pub fn with_timeout(mut self, timeout_ms: u32) -> Self {
        self.tx = self.tx.with_timeout(timeout_ms);
        self
    }

    /// Log to `log` instead of the global console stream.
    pub fn with_log_stream(mut self, log: &'static LogStream) -> Self {
        self.log = log;
        self
    }

    /// Drain the ingest queue through the line editor.
    ///
    /// Call repeatedly from the main loop. Blocks only inside the bounded
    /// transmit wait. Returns the number of bytes consumed.
    pub fn process_pending(&mut self) -> usize {
        let mut consumed = 0;

        while let Some(byte) = self.ctx.rx_queue.pop() {
            consumed += 1;
            let line_len = self.editor.line().len();

            match self.editor.process_byte(byte, &mut self.tx, &mut self.handler) {
                EditOutcome::Dispatched => {
                    console_debug!(self.log, self.tx.clock().now_us(), "line dispatched ({} bytes)", line_len);
                }
                EditOutcome::Dropped => {
                    console_debug!(self.log, self.tx.clock().now_us(), "line full, dropped 0x{:02x}", byte);
                }
                _ => {}
            }
        }

        self.report_losses();
        consumed
    }

    /// Transmit a `'static` buffer.
    pub fn print(&mut self, bytes: &'static [u8]) -> Result<(), TxError> {
        self.tx.print(bytes)
    }

    /// Transmit a copy of `bytes` followed by CR LF.
    pub fn println(&mut self, bytes: &[u8]) -> Result<(), TxError> {
        self.tx.println(bytes)
    }

    /// Transmit a copy of `bytes`.
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), TxError> {
        self.tx.write(bytes)
    }

    /// Print welcome banner
    pub fn print_banner(&mut self) -> Result<(), TxError> {
        self.tx.println(VERSION.as_bytes())?;
        console_info!(self.log, self.tx.clock().now_us(), "{} ready", VERSION);
        Ok(())
    }

    /// Drain up to `max` pending log entries into `sink`.
    ///
    /// `sink` must be a separate port (log UART, stderr). Log lines never go
    /// through the console transmitter: they would land in the middle of the
    /// line being typed, and a timed-out log write would itself be reported
    /// as a new log entry.
    pub fn drain_logs<W: fmt::Write>(&self, sink: &mut W, max: usize) -> usize {
        drain_to(self.log, sink, max)
    }

    /// Snapshot of all console counters.
    pub fn stats(&self) -> ConsoleStats {
        let channel = self.tx.channel();
        ConsoleStats {
            rx_dropped: self.ctx.rx_queue.dropped(),
            rx_rearm_errors: self.ctx.rx_rearm_errors(),
            line_dropped: self.editor.dropped(),
            lines_dispatched: self.editor.dispatched(),
            tx_started: channel.started(),
            tx_timeouts: channel.timeouts(),
            tx_errors: channel.hw_errors(),
        }
    }

    pub fn context(&self) -> &'static ConsoleContext<RX, TX> {
        self.ctx
    }

    pub fn editor(&self) -> &LineEditor<LINE> {
        &self.editor
    }

    pub fn transmitter(&self) -> &AsyncTransmitter<U, C, TX> {
        &self.tx
    }

    pub fn transmitter_mut(&mut self) -> &mut AsyncTransmitter<U, C, TX> {
        &mut self.tx
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Log losses that happened since the last report.
    fn report_losses(&mut self) {
        let now = self.stats();
        let prev = self.reported;
        if now == prev {
            return;
        }
        let ts = self.tx.clock().now_us();

        let rx_dropped = now.rx_dropped.wrapping_sub(prev.rx_dropped);
        if rx_dropped > 0 {
            console_warn!(self.log, ts, "rx queue overflow: {} bytes dropped", rx_dropped);
        }
        let rearm = now.rx_rearm_errors.wrapping_sub(prev.rx_rearm_errors);
        if rearm > 0 {
            console_error!(self.log, ts, "rx re-arm failed {} times", rearm);
        }
        let timeouts = now.tx_timeouts.wrapping_sub(prev.tx_timeouts);
        if timeouts > 0 {
            console_warn!(self.log, ts, "tx timeout: {} writes lost", timeouts);
        }
        let errors = now.tx_errors.wrapping_sub(prev.tx_errors);
        if errors > 0 {
            console_error!(self.log, ts, "tx start failed {} times", errors);
        }

        self.reported = now;
    }
}
