//! Serial line console
//!
//! Lazy polling from the main loop - no dedicated task.
//! Zero heap allocation - all static buffers.

pub mod console;
pub mod editor;
pub mod handler;
pub mod line_buffer;

pub use console::{Console, ConsoleContext, VERSION};
pub use editor::{EditOutcome, LineEditor, BACKSPACE, DELETE, ERASE_SEQUENCE};
pub use handler::{EchoHandler, LineHandler};
pub use line_buffer::LineBuffer;
