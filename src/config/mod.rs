//! Module: config
//!
//! Purpose: Compile-time configuration for the serial console.
//!
//! Architecture:
//! - Buffer capacities are const generic defaults, sized here once
//! - Newline and enter-key selection feed the line editor
//! - UART settings for the board binary
//!
//! Ring capacities must be powers of 2 (indices are masked, not divided).

/// RX ingest queue capacity in bytes. One slot is kept free, so 63 bytes
/// can be buffered between polls.
pub const RX_BUFFER_SIZE: usize = 64;

/// Command line capacity. One slot is reserved, so lines hold at most 63 bytes.
pub const LINE_BUFFER_SIZE: usize = 64;

/// Transmit scratch buffer capacity (copying prints and `println`).
pub const TX_BUFFER_SIZE: usize = 128;

/// How long `print` spins waiting for the previous transmission (ms).
pub const TX_TIMEOUT_MS: u32 = 10;

/// Newline sequence echoed when a line is entered.
pub const NEWLINE: Newline = Newline::CrLf;

/// Bytes accepted as the enter key.
pub const ENTER: EnterKeys = EnterKeys::CR_OR_LF;

/// Newline sequence selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Newline {
    Cr,
    Lf,
    CrLf,
}

impl Newline {
    /// Bytes sent on the wire.
    pub const fn as_bytes(self) -> &'static [u8] {
        match self {
            Newline::Cr => b"\r",
            Newline::Lf => b"\n",
            Newline::CrLf => b"\r\n",
        }
    }
}

/// Set of bytes recognised as the enter key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnterKeys {
    cr: bool,
    lf: bool,
}

impl EnterKeys {
    /// Carriage return only; a bare LF is treated as an ignored control byte.
    pub const CR: Self = Self { cr: true, lf: false };
    /// Line feed only.
    pub const LF: Self = Self { cr: false, lf: true };
    /// Either byte ends the line. A CRLF pair dispatches once, since the LF
    /// arrives on an empty line and is ignored.
    pub const CR_OR_LF: Self = Self { cr: true, lf: true };

    #[inline]
    pub const fn matches(self, byte: u8) -> bool {
        (self.cr && byte == b'\r') || (self.lf && byte == b'\n')
    }
}

/// Line editor behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditorConfig {
    pub newline: Newline,
    pub enter: EnterKeys,
}

impl EditorConfig {
    pub const DEFAULT: Self = Self {
        newline: NEWLINE,
        enter: ENTER,
    };
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// UART settings for the console port.
pub struct UartConfig {
    pub baud_rate: u32,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self { baud_rate: 115200 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newline_bytes() {
        assert_eq!(Newline::Cr.as_bytes(), b"\r");
        assert_eq!(Newline::Lf.as_bytes(), b"\n");
        assert_eq!(Newline::CrLf.as_bytes(), b"\r\n");
    }

    #[test]
    fn test_enter_keys() {
        assert!(EnterKeys::CR_OR_LF.matches(b'\r'));
        assert!(EnterKeys::CR_OR_LF.matches(b'\n'));
        assert!(EnterKeys::CR.matches(b'\r'));
        assert!(!EnterKeys::CR.matches(b'\n'));
        assert!(!EnterKeys::LF.matches(b'\r'));
        assert!(!EnterKeys::CR_OR_LF.matches(b'a'));
    }

    #[test]
    fn test_capacities_are_powers_of_two() {
        assert!(RX_BUFFER_SIZE.is_power_of_two());
        assert!(crate::logging::LOG_BUFFER_SIZE.is_power_of_two());
    }
}
