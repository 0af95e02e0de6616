//! # RustSerialConsole
//!
//! Interrupt-driven serial line console for embedded controllers.
//!
//! ## Architecture
//!
//! ```text
//! RX ISR ─▶ ByteIngestQueue ─▶ process_pending() ─▶ LineEditor ─▶ LineHandler
//!                                                     │ echo          │ reply
//!                                                     ▼               ▼
//! TX ISR ◀─────────────────── UART ◀──────────── AsyncTransmitter ◀───┘
//! (on_transmit_complete)
//! ```
//!
//! - RX: interrupt produces, poll loop consumes, lock-free SPSC ring
//! - TX: poll loop claims the busy flag, interrupt releases it
//! - No locks, no heap, no unbounded waits

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod console;
pub mod error;
pub mod hal;
pub mod ingest;
pub mod log_drain;
pub mod log_globals;
pub mod logging;
pub mod stats;
pub mod transmit;

pub use config::{EditorConfig, EnterKeys, Newline};
pub use console::{Console, ConsoleContext, EchoHandler, EditOutcome, LineEditor, LineHandler};
pub use error::TxError;
pub use hal::{Clock, HwError, UartRx, UartTx};
pub use ingest::{ByteIngestQueue, PushOutcome};
pub use log_globals::CONSOLE_LOG_STREAM;
pub use stats::ConsoleStats;
pub use transmit::{AsyncTransmitter, ConsoleOutput, TxChannel};
