//! Test doubles shared by the integration tests

#![allow(dead_code)]

use std::cell::Cell;

use rust_serial_console::{
    Clock, ConsoleContext, ConsoleOutput, HwError, LineHandler, TxChannel, TxError, UartRx,
    UartTx,
};

/// Clock that advances `step` ms every time it is read.
pub struct SteppingClock {
    now: Cell<u32>,
    step: u32,
}

impl SteppingClock {
    pub fn new(step: u32) -> Self {
        Self { now: Cell::new(0), step }
    }

    pub fn starting_at(start: u32, step: u32) -> Self {
        Self { now: Cell::new(start), step }
    }
}

impl Clock for SteppingClock {
    fn now_ms(&self) -> u32 {
        let now = self.now.get();
        self.now.set(now.wrapping_add(self.step));
        now
    }
}

/// Something that can play the TX-complete interrupt.
pub trait Completion: Sync {
    fn complete(&self);
    fn busy(&self) -> bool;
}

impl<const S: usize> Completion for TxChannel<S> {
    fn complete(&self) {
        self.on_transmit_complete();
    }

    fn busy(&self) -> bool {
        self.is_busy()
    }
}

impl<const RX: usize, const TX: usize> Completion for ConsoleContext<RX, TX> {
    fn complete(&self) {
        self.on_transmit_complete();
    }

    fn busy(&self) -> bool {
        self.is_busy()
    }
}

/// UART that records every started transmission.
///
/// When attached to a channel it samples the busy flag at each start, and
/// with `auto_complete` it plays the TX-complete interrupt immediately.
pub struct MockUart {
    pub sent: Vec<Vec<u8>>,
    pub channel: Option<&'static dyn Completion>,
    pub auto_complete: bool,
    pub fail_next: Option<HwError>,
    /// Busy flag as seen from inside each `start_transmit` call
    pub busy_at_start: Vec<bool>,
}

impl MockUart {
    fn attached(channel: Option<&'static dyn Completion>, auto_complete: bool) -> Self {
        Self {
            sent: Vec::new(),
            channel,
            auto_complete,
            fail_next: None,
            busy_at_start: Vec::new(),
        }
    }

    /// Never signals completion.
    pub fn stalled() -> Self {
        Self::attached(None, false)
    }

    /// Signals completion as soon as a transmit starts.
    pub fn completing(target: &'static dyn Completion) -> Self {
        Self::attached(Some(target), true)
    }

    /// Watches `target` but never signals completion.
    pub fn observing(target: &'static dyn Completion) -> Self {
        Self::attached(Some(target), false)
    }

    /// Everything transmitted, concatenated.
    pub fn wire(&self) -> Vec<u8> {
        self.sent.concat()
    }
}

impl UartTx for MockUart {
    fn start_transmit(&mut self, bytes: &'static [u8]) -> Result<(), HwError> {
        if let Some(channel) = self.channel {
            self.busy_at_start.push(channel.busy());
        }
        if let Some(e) = self.fail_next.take() {
            return Err(e);
        }
        self.sent.push(bytes.to_vec());
        if let (true, Some(channel)) = (self.auto_complete, self.channel) {
            channel.complete();
        }
        Ok(())
    }
}

/// RX side that counts re-arms.
#[derive(Default)]
pub struct MockRx {
    pub armed: usize,
    pub fail: bool,
}

impl UartRx for MockRx {
    fn arm_receive(&mut self) -> Result<(), HwError> {
        if self.fail {
            return Err(HwError::Busy);
        }
        self.armed += 1;
        Ok(())
    }
}

/// Console output that records the wire bytes, optionally failing.
#[derive(Default)]
pub struct RecordingOutput {
    pub wire: Vec<u8>,
    pub fail_with: Option<TxError>,
}

impl RecordingOutput {
    fn send(&mut self, bytes: &[u8]) -> Result<(), TxError> {
        if let Some(e) = self.fail_with {
            return Err(e);
        }
        self.wire.extend_from_slice(bytes);
        Ok(())
    }
}

impl ConsoleOutput for RecordingOutput {
    fn print(&mut self, bytes: &'static [u8]) -> Result<(), TxError> {
        self.send(bytes)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), TxError> {
        self.send(bytes)
    }

    fn println(&mut self, bytes: &[u8]) -> Result<(), TxError> {
        self.send(bytes)?;
        self.send(b"\r\n")
    }
}

/// Handler that keeps every dispatched line.
#[derive(Default)]
pub struct Recorder {
    pub lines: Vec<Vec<u8>>,
}

impl LineHandler for Recorder {
    fn dispatch(&mut self, line: &[u8], _out: &mut dyn ConsoleOutput) {
        self.lines.push(line.to_vec());
    }
}

pub fn leak_channel<const S: usize>() -> &'static TxChannel<S> {
    Box::leak(Box::new(TxChannel::new()))
}

pub fn leak_context<const RX: usize, const TX: usize>() -> &'static ConsoleContext<RX, TX> {
    Box::leak(Box::new(ConsoleContext::new()))
}
