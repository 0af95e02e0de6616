//! Line editor state machine
//!
//! Single state (collecting). Each byte is classified in priority order:
//! erase, enter, printable, other control.

use super::handler::LineHandler;
use super::line_buffer::LineBuffer;
use crate::config::{EditorConfig, LINE_BUFFER_SIZE};
use crate::transmit::ConsoleOutput;

/// Backspace key.
pub const BACKSPACE: u8 = 0x08;

/// Delete key (sent by most terminals for backspace).
pub const DELETE: u8 = 0x7F;

/// Terminal sequence that rubs out the last character.
pub const ERASE_SEQUENCE: &[u8] = b"\x08 \x08";

/// What a single input byte did to the line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    /// Printable byte stored and echoed.
    Appended,
    /// Last byte removed and rubbed out on the terminal.
    Erased,
    /// Line handed to the handler, buffer reset.
    Dispatched,
    /// Line full, printable byte discarded without echo.
    Dropped,
    /// No effect: control byte, erase on empty line, or enter on empty line.
    Ignored,
}

/// Console line editor
pub struct LineEditor<const M: usize = LINE_BUFFER_SIZE> {
    line: LineBuffer<M>,
    config: EditorConfig,
    dispatched: u32,
    dropped: u32,
}

impl<const M: usize> LineEditor<M> {
    /// Create new editor with the default configuration
    pub const fn new() -> Self {
        Self::with_config(EditorConfig::DEFAULT)
    }

    pub const fn with_config(config: EditorConfig) -> Self {
        Self {
            line: LineBuffer::new(),
            config,
            dispatched: 0,
            dropped: 0,
        }
    }

    /// Process a single input byte
    ///
    /// Echo failures are ignored: the byte is consumed either way and the
    /// line state is never rolled back.
    pub fn process_byte(
        &mut self,
        byte: u8,
        out: &mut dyn ConsoleOutput,
        handler: &mut dyn LineHandler,
    ) -> EditOutcome {
        match byte {
            BACKSPACE | DELETE => {
                if self.line.backspace() {
                    let _ = out.print(ERASE_SEQUENCE);
                    EditOutcome::Erased
                } else {
                    EditOutcome::Ignored
                }
            }

            b if self.config.enter.matches(b) => {
                if self.line.is_empty() {
                    return EditOutcome::Ignored;
                }
                let _ = out.print(self.config.newline.as_bytes());
                handler.dispatch(self.line.as_bytes(), out);
                self.line.clear();
                self.dispatched = self.dispatched.wrapping_add(1);
                EditOutcome::Dispatched
            }

            0x20..=0xFF => {
                if self.line.push(byte) {
                    let _ = out.write(&[byte]);
                    EditOutcome::Appended
                } else {
                    self.dropped = self.dropped.wrapping_add(1);
                    EditOutcome::Dropped
                }
            }

            _ => EditOutcome::Ignored,
        }
    }

    /// Line collected so far
    pub fn line(&self) -> &LineBuffer<M> {
        &self.line
    }

    pub fn config(&self) -> EditorConfig {
        self.config
    }

    /// Lines dispatched since boot
    pub fn dispatched(&self) -> u32 {
        self.dispatched
    }

    /// Printable bytes dropped on a full line since boot
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl<const M: usize> Default for LineEditor<M> {
    fn default() -> Self {
        Self::new()
    }
}
