//! Asynchronous transmit path with a single in-flight operation.
//!
//! # Architecture
//!
//! ```text
//! Poll loop                      TxChannel                 TX ISR
//! ─────────                      ─────────                 ──────
//! print() ── claim busy ───────▶ [busy][scratch] ◀──────── on_transmit_complete()
//!          └─ start_transmit ──▶ UART                        clears busy
//! ```
//!
//! # Rules
//!
//! - Busy is claimed before the hardware start call, cleared by completion
//! - Waiting for busy is a bounded spin, never an indefinite block
//! - Buffers handed to the UART are either `'static` caller data or the
//!   channel scratch, which is only refilled after busy has been claimed
//! - A failed hardware start releases busy at once; no completion will come

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::config::{TX_BUFFER_SIZE, TX_TIMEOUT_MS};
use crate::error::TxError;
use crate::hal::{Clock, UartTx};

/// Output side of the console as seen by the line editor and line handlers.
pub trait ConsoleOutput {
    /// Transmit a buffer that lives for the whole program.
    fn print(&mut self, bytes: &'static [u8]) -> Result<(), TxError>;

    /// Transmit a copy of `bytes`.
    fn write(&mut self, bytes: &[u8]) -> Result<(), TxError>;

    /// Transmit a copy of `bytes` followed by CR LF.
    fn println(&mut self, bytes: &[u8]) -> Result<(), TxError>;
}

/// Interrupt-shared transmit state.
///
/// # Safety
///
/// `scratch` is written only by the poll context, and only while it holds
/// the busy flag it claimed itself; the UART reads it until completion
/// clears the flag. The two never overlap.
pub struct TxChannel<const S: usize = TX_BUFFER_SIZE> {
    busy: AtomicBool,
    scratch: UnsafeCell<[u8; S]>,
    started: AtomicU32,
    timeouts: AtomicU32,
    hw_errors: AtomicU32,
}

// SAFETY: busy flag hands scratch ownership between the two contexts.
unsafe impl<const S: usize> Sync for TxChannel<S> {}
unsafe impl<const S: usize> Send for TxChannel<S> {}

impl<const S: usize> TxChannel<S> {
    /// Create an idle channel.
    ///
    /// # Panics
    ///
    /// Panics at compile time if S < 2 (no room for CR LF).
    ///
    /// ```compile_fail
    /// let _ = rust_serial_console::TxChannel::<0>::new();
    /// ```
    pub const fn new() -> Self {
        const { assert!(S >= 2, "Scratch buffer must hold at least CR LF") };

        Self {
            busy: AtomicBool::new(false),
            scratch: UnsafeCell::new([0u8; S]),
            started: AtomicU32::new(0),
            timeouts: AtomicU32::new(0),
            hw_errors: AtomicU32::new(0),
        }
    }

    /// Transmit-complete handler (interrupt context).
    #[inline]
    pub fn on_transmit_complete(&self) {
        self.busy.store(false, Ordering::Release);
    }

    /// Non-blocking busy query.
    #[inline]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Scratch capacity in bytes.
    #[inline]
    pub const fn capacity(&self) -> usize {
        S
    }

    /// Transmissions successfully started since boot.
    pub fn started(&self) -> u32 {
        self.started.load(Ordering::Relaxed)
    }

    /// `print` calls that gave up waiting for the previous transmission.
    pub fn timeouts(&self) -> u32 {
        self.timeouts.load(Ordering::Relaxed)
    }

    /// Hardware start failures.
    pub fn hw_errors(&self) -> u32 {
        self.hw_errors.load(Ordering::Relaxed)
    }

    #[inline]
    fn try_claim(&self) -> bool {
        self.busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }
}

impl<const S: usize> Default for TxChannel<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Poll-side transmitter: owns the UART start path and the clock used for
/// the bounded wait.
pub struct AsyncTransmitter<U, C, const S: usize = TX_BUFFER_SIZE> {
    channel: &'static TxChannel<S>,
    uart: U,
    clock: C,
    timeout_ms: u32,
}

impl<U: UartTx, C: Clock, const S: usize> AsyncTransmitter<U, C, S> {
    pub fn new(channel: &'static TxChannel<S>, uart: U, clock: C) -> Self {
        Self {
            channel,
            uart,
            clock,
            timeout_ms: TX_TIMEOUT_MS,
        }
    }

    /// Override the bounded-wait timeout.
    pub fn with_timeout(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Start transmitting a `'static` buffer.
    ///
    /// Spins until the previous transmission completes, for at most the
    /// configured timeout. Returns `TxError::Busy` without starting anything
    /// if it does not.
    pub fn print(&mut self, bytes: &'static [u8]) -> Result<(), TxError> {
        self.claim()?;
        self.start(bytes)
    }

    /// Copy `bytes` into the scratch buffer and transmit them.
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), TxError> {
        if bytes.len() > S {
            return Err(TxError::BufferTooSmall);
        }
        self.claim()?;

        let scratch = self.scratch();
        scratch[..bytes.len()].copy_from_slice(bytes);
        let filled: &'static [u8; S] = scratch;
        self.start(&filled[..bytes.len()])
    }

    /// Copy `bytes` into the scratch buffer, append CR LF and transmit.
    pub fn println(&mut self, bytes: &[u8]) -> Result<(), TxError> {
        let len = bytes.len();
        if len + 2 > S {
            return Err(TxError::BufferTooSmall);
        }
        self.claim()?;

        let scratch = self.scratch();
        scratch[..len].copy_from_slice(bytes);
        scratch[len] = b'\r';
        scratch[len + 1] = b'\n';
        let filled: &'static [u8; S] = scratch;
        self.start(&filled[..len + 2])
    }

    /// Non-blocking busy query.
    #[inline]
    pub fn is_busy(&self) -> bool {
        self.channel.is_busy()
    }

    pub fn channel(&self) -> &'static TxChannel<S> {
        self.channel
    }

    pub fn uart(&self) -> &U {
        &self.uart
    }

    pub fn uart_mut(&mut self) -> &mut U {
        &mut self.uart
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Bounded spin until busy can be claimed.
    fn claim(&self) -> Result<(), TxError> {
        let start = self.clock.now_ms();
        loop {
            if self.channel.try_claim() {
                return Ok(());
            }
            if self.clock.now_ms().wrapping_sub(start) > self.timeout_ms {
                self.channel.timeouts.fetch_add(1, Ordering::Relaxed);
                return Err(TxError::Busy);
            }
            core::hint::spin_loop();
        }
    }

    /// Scratch storage. Only called while holding the claimed busy flag.
    fn scratch(&mut self) -> &'static mut [u8; S] {
        // SAFETY: busy was claimed by this context, so the previous
        // transmission has completed and nothing else references scratch.
        unsafe { &mut *self.channel.scratch.get() }
    }

    fn start(&mut self, bytes: &'static [u8]) -> Result<(), TxError> {
        match self.uart.start_transmit(bytes) {
            Ok(()) => {
                self.channel.started.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(e) => {
                // No completion interrupt follows a failed start.
                self.channel.hw_errors.fetch_add(1, Ordering::Relaxed);
                self.channel.busy.store(false, Ordering::Release);
                Err(TxError::Hardware(e))
            }
        }
    }
}

impl<U: UartTx, C: Clock, const S: usize> ConsoleOutput for AsyncTransmitter<U, C, S> {
    fn print(&mut self, bytes: &'static [u8]) -> Result<(), TxError> {
        AsyncTransmitter::print(self, bytes)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), TxError> {
        AsyncTransmitter::write(self, bytes)
    }

    fn println(&mut self, bytes: &[u8]) -> Result<(), TxError> {
        AsyncTransmitter::println(self, bytes)
    }
}

/// Formatted output, one scratch-sized transmission per chunk.
impl<U: UartTx, C: Clock, const S: usize> core::fmt::Write for AsyncTransmitter<U, C, S> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for chunk in s.as_bytes().chunks(S) {
            AsyncTransmitter::write(self, chunk).map_err(|_| core::fmt::Error)?;
        }
        Ok(())
    }
}
