//! Console output error types

use crate::hal::HwError;

/// Status of a polled-context transmit request.
///
/// Interrupt-side losses (RX queue full) are never errors; they show up as
/// `PushOutcome::Dropped` and in the statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxError {
    /// T01: Previous transmission did not finish within the timeout
    Busy,
    /// T02: Payload plus newline exceeds the scratch buffer
    BufferTooSmall,
    /// T03: UART refused to start the transmit
    Hardware(HwError),
}

impl TxError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Busy => "T01",
            Self::BufferTooSmall => "T02",
            Self::Hardware(_) => "T03",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::Busy => "transmit timeout",
            Self::BufferTooSmall => "buffer too small",
            Self::Hardware(_) => "hardware error",
        }
    }
}

impl From<HwError> for TxError {
    fn from(e: HwError) -> Self {
        Self::Hardware(e)
    }
}

impl core::fmt::Display for TxError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Hardware(HwError::Other(code)) => {
                write!(f, "{}: {} ({})", self.code(), self.message(), code)
            }
            Self::Hardware(hw) => write!(f, "{}: {} ({:?})", self.code(), self.message(), hw),
            _ => write!(f, "{}: {}", self.code(), self.message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", TxError::Busy), "T01: transmit timeout");
        assert_eq!(format!("{}", TxError::BufferTooSmall), "T02: buffer too small");
        assert_eq!(
            format!("{}", TxError::Hardware(HwError::Other(-3))),
            "T03: hardware error (-3)"
        );
        assert_eq!(
            format!("{}", TxError::Hardware(HwError::Busy)),
            "T03: hardware error (Busy)"
        );
    }
}
