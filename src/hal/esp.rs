//! ESP-IDF UART and tick adapters.
//!
//! The IDF UART driver owns the real interrupts and keeps its own RX/TX
//! ring buffers. These adapters bridge it to the console seams:
//! - `uart_write_bytes` copies into the driver TX ring before returning, so
//!   the transmit is complete from the console's point of view and the
//!   completion callback fires right away
//! - RX is polled without blocking and each byte is fed through
//!   `ConsoleContext::ingest_byte`, exactly like the RX ISR would
//! - logs leave on a second, TX-only UART so they never interleave with
//!   the line being edited on the console port

use esp_idf_svc::hal::delay::NON_BLOCK;
use esp_idf_svc::hal::gpio;
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::hal::uart::{self, UartDriver, UartTxDriver};
use esp_idf_svc::sys::EspError;

use super::{Clock, HwError, UartRx, UartTx};
use crate::config::UartConfig;

impl From<EspError> for HwError {
    fn from(e: EspError) -> Self {
        HwError::Other(e.code())
    }
}

/// System tick from `esp_timer`.
pub struct EspClock;

impl Clock for EspClock {
    fn now_ms(&self) -> u32 {
        (self.now_us() / 1000) as u32
    }

    fn now_us(&self) -> i64 {
        // SAFETY: esp_timer_get_time is always safe to call
        unsafe { esp_idf_svc::sys::esp_timer_get_time() }
    }
}

/// Console UART on top of the IDF driver.
pub struct EspUart<'d> {
    driver: UartDriver<'d>,
    on_complete: fn(),
}

impl<'d> EspUart<'d> {
    /// Install the IDF UART driver. `on_complete` is invoked once each
    /// transmit has been handed to the driver.
    pub fn new(
        uart: impl Peripheral<P = impl uart::Uart> + 'd,
        tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
        rx_pin: impl Peripheral<P = impl gpio::InputPin> + 'd,
        config: &UartConfig,
        on_complete: fn(),
    ) -> Result<Self, EspError> {
        let uart_config = uart::config::Config::default()
            .baudrate(esp_idf_svc::hal::units::Hertz(config.baud_rate));

        let driver = UartDriver::new(
            uart,
            tx_pin,
            rx_pin,
            Option::<gpio::AnyIOPin>::None, // CTS
            Option::<gpio::AnyIOPin>::None, // RTS
            &uart_config,
        )?;

        Ok(Self { driver, on_complete })
    }

    /// Read one pending byte, if any.
    pub fn poll_byte(&self) -> Option<u8> {
        let mut byte = [0u8; 1];
        match self.driver.read(&mut byte, NON_BLOCK) {
            Ok(1) => Some(byte[0]),
            _ => None,
        }
    }
}

impl UartTx for EspUart<'_> {
    fn start_transmit(&mut self, bytes: &'static [u8]) -> Result<(), HwError> {
        let mut sent = 0;
        while sent < bytes.len() {
            sent += self.driver.write(&bytes[sent..])?;
        }
        (self.on_complete)();
        Ok(())
    }
}

/// RX side of the IDF driver. Reception stays armed permanently, so
/// re-arming is a no-op.
pub struct IdfRx;

impl UartRx for IdfRx {
    fn arm_receive(&mut self) -> Result<(), HwError> {
        Ok(())
    }
}

/// TX-only log port.
///
/// ```text
/// ESP32-S3 GPIO6 (TX) ──────▶ USB-UART RX
///                              └─▶ PC Serial Monitor
/// ```
pub struct LogUart<'d> {
    driver: UartTxDriver<'d>,
}

impl<'d> LogUart<'d> {
    pub fn new(
        uart: impl Peripheral<P = impl uart::Uart> + 'd,
        tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
        config: &UartConfig,
    ) -> Result<Self, EspError> {
        let uart_config = uart::config::Config::default()
            .baudrate(esp_idf_svc::hal::units::Hertz(config.baud_rate));

        let driver = UartTxDriver::new(
            uart,
            tx_pin,
            Option::<gpio::AnyIOPin>::None, // CTS
            Option::<gpio::AnyIOPin>::None, // RTS
            &uart_config,
        )?;

        Ok(Self { driver })
    }
}

impl core::fmt::Write for LogUart<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let bytes = s.as_bytes();
        let mut sent = 0;
        while sent < bytes.len() {
            sent += self.driver.write(&bytes[sent..]).map_err(|_| core::fmt::Error)?;
        }
        Ok(())
    }
}
