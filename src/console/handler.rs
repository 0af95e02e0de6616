//! Line dispatch collaborators

use crate::transmit::ConsoleOutput;

/// Receives each completed, non-empty line.
///
/// Called from the poll context right after the newline echo. `line` is
/// only valid for the duration of the call.
pub trait LineHandler {
    fn dispatch(&mut self, line: &[u8], out: &mut dyn ConsoleOutput);
}

impl<F> LineHandler for F
where
    F: FnMut(&[u8], &mut dyn ConsoleOutput),
{
    fn dispatch(&mut self, line: &[u8], out: &mut dyn ConsoleOutput) {
        self(line, out)
    }
}

/// Reference handler: answers every line with `CMD: <line>`.
#[derive(Clone, Copy, Debug, Default)]
pub struct EchoHandler;

impl EchoHandler {
    pub const PREFIX: &'static [u8] = b"CMD: ";
}

impl LineHandler for EchoHandler {
    fn dispatch(&mut self, line: &[u8], out: &mut dyn ConsoleOutput) {
        let _ = out.print(Self::PREFIX);
        let _ = out.println(line);
    }
}
