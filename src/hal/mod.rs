//! Hardware Abstraction Layer for RustSerialConsole.
//!
//! Thin seams around the UART and the system tick.
//! Console logic stays in core modules, HAL is just I/O.

#[cfg(target_os = "espidf")]
pub mod esp;

/// Hardware status from a UART start call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HwError {
    /// Peripheral already in use.
    Busy,
    /// Peripheral did not respond in time.
    Timeout,
    /// Vendor error code.
    Other(i32),
}

/// Interrupt-driven UART transmit.
pub trait UartTx {
    /// Start an asynchronous transmit of `bytes`.
    ///
    /// The implementation may keep reading `bytes` until it signals
    /// completion (the TX-complete interrupt calls
    /// `ConsoleContext::on_transmit_complete`). It must not touch the
    /// buffer afterwards: the console reuses its scratch storage once the
    /// busy flag clears.
    fn start_transmit(&mut self, bytes: &'static [u8]) -> Result<(), HwError>;
}

/// Interrupt-driven single-byte UART receive.
pub trait UartRx {
    /// Arm reception of the next byte.
    fn arm_receive(&mut self) -> Result<(), HwError>;
}

/// Monotonic millisecond tick. Wraps at `u32::MAX`.
pub trait Clock {
    fn now_ms(&self) -> u32;

    /// Timestamp for log entries.
    fn now_us(&self) -> i64 {
        i64::from(self.now_ms()) * 1000
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }

    fn now_us(&self) -> i64 {
        (**self).now_us()
    }
}

impl<T: UartTx + ?Sized> UartTx for &mut T {
    fn start_transmit(&mut self, bytes: &'static [u8]) -> Result<(), HwError> {
        (**self).start_transmit(bytes)
    }
}

impl<T: UartRx + ?Sized> UartRx for &mut T {
    fn arm_receive(&mut self) -> Result<(), HwError> {
        (**self).arm_receive()
    }
}
