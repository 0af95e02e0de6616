//! RustSerialConsole - Main entry point
//!
//! On the ESP32-S3 the console runs on UART0 (GPIO43 TX / GPIO44 RX) and
//! logs go out on UART1 (GPIO6 TX).
//! On the host the same pipeline runs over stdin/stdout: a reader thread
//! plays the RX interrupt and the stdout sink plays the TX-complete
//! interrupt. Logs go to stderr.

#![cfg_attr(target_os = "espidf", no_std)]
#![cfg_attr(target_os = "espidf", no_main)]

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys as esp_idf_sys;

use rust_serial_console::{Console, ConsoleContext, EchoHandler};

// Static allocation: shared with the UART interrupts
static CONSOLE: ConsoleContext = ConsoleContext::new();

/// TX-complete callback
fn on_tx_complete() {
    CONSOLE.on_transmit_complete();
}

#[cfg(target_os = "espidf")]
#[no_mangle]
fn main() {
    use esp_idf_svc::hal::peripherals::Peripherals;
    use rust_serial_console::config::UartConfig;
    use rust_serial_console::hal::esp::{EspClock, EspUart, IdfRx, LogUart};

    // Initialize ESP-IDF
    esp_idf_sys::link_patches();

    let Ok(peripherals) = Peripherals::take() else {
        return;
    };
    let pins = peripherals.pins;
    let Ok(uart) = EspUart::new(
        peripherals.uart0,
        pins.gpio43,
        pins.gpio44,
        &UartConfig::default(),
        on_tx_complete,
    ) else {
        return;
    };

    let Ok(mut log_uart) = LogUart::new(peripherals.uart1, pins.gpio6, &UartConfig::default())
    else {
        return;
    };

    let mut rx = IdfRx;
    if CONSOLE.init(&mut rx).is_err() {
        return;
    }

    let mut console: Console<_, _, _> = Console::new(&CONSOLE, uart, EspClock, EchoHandler);
    let _ = console.print_banner();

    loop {
        // Feed the ingest queue as the RX interrupt would
        while let Some(byte) = console.transmitter().uart().poll_byte() {
            CONSOLE.ingest_byte(byte, &mut rx);
        }

        console.process_pending();
        console.drain_logs(&mut log_uart, 4);

        unsafe {
            esp_idf_sys::vTaskDelay(1);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    use std::io::{Read, Write};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::{Duration, Instant};

    use rust_serial_console::logging::LogLevel;
    use rust_serial_console::CONSOLE_LOG_STREAM;
    use rust_serial_console::{Clock, HwError, UartRx, UartTx};

    struct HostClock(Instant);

    impl Clock for HostClock {
        fn now_ms(&self) -> u32 {
            self.0.elapsed().as_millis() as u32
        }
    }

    struct StdoutUart;

    impl UartTx for StdoutUart {
        fn start_transmit(&mut self, bytes: &'static [u8]) -> Result<(), HwError> {
            let mut out = std::io::stdout().lock();
            out.write_all(bytes)
                .and_then(|()| out.flush())
                .map_err(|e| HwError::Other(e.raw_os_error().unwrap_or(-1)))?;
            on_tx_complete();
            Ok(())
        }
    }

    struct StdinRx;

    impl UartRx for StdinRx {
        fn arm_receive(&mut self) -> Result<(), HwError> {
            Ok(())
        }
    }

    static EOF: AtomicBool = AtomicBool::new(false);

    if let Err(e) = CONSOLE.init(&mut StdinRx) {
        eprintln!("console init failed: {:?}", e);
        return;
    }
    CONSOLE_LOG_STREAM.set_level(LogLevel::Debug);

    std::thread::spawn(|| {
        let mut rx = StdinRx;
        for byte in std::io::stdin().lock().bytes() {
            let Ok(byte) = byte else {
                break;
            };
            // Spin like a slow UART would rather than drop on a full queue
            while CONSOLE.rx_queue().is_full() {
                std::thread::sleep(Duration::from_millis(1));
            }
            CONSOLE.ingest_byte(byte, &mut rx);
        }
        EOF.store(true, Ordering::Release);
    });

    let mut console: Console<_, _, _> =
        Console::new(&CONSOLE, StdoutUart, HostClock(Instant::now()), EchoHandler);
    let _ = console.print_banner();

    let mut logs = String::new();
    loop {
        let done = EOF.load(Ordering::Acquire);
        console.process_pending();

        console.drain_logs(&mut logs, usize::MAX);
        if !logs.is_empty() {
            eprint!("{}", logs);
            logs.clear();
        }

        if done && CONSOLE.rx_queue().is_empty() {
            break;
        }
        std::thread::sleep(Duration::from_millis(1));
    }

    eprintln!("{}", console.stats());
}
