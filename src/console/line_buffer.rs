//! Command line buffer for console input

use crate::config::LINE_BUFFER_SIZE;

/// Bounded line buffer with a cursor.
///
/// One of the `M` slots is reserved, so at most `M - 1` bytes are held.
pub struct LineBuffer<const M: usize = LINE_BUFFER_SIZE> {
    buf: [u8; M],
    len: usize,
}

impl<const M: usize> LineBuffer<M> {
    /// Create empty buffer
    pub const fn new() -> Self {
        const { assert!(M >= 2, "Line buffer needs room for at least one byte") };

        Self {
            buf: [0u8; M],
            len: 0,
        }
    }

    /// Append a byte. Returns `false` (and changes nothing) when full.
    pub fn push(&mut self, c: u8) -> bool {
        if self.len < M - 1 {
            self.buf[self.len] = c;
            self.len += 1;
            true
        } else {
            false
        }
    }

    /// Remove last byte. Returns `false` if there was nothing to remove.
    pub fn backspace(&mut self) -> bool {
        if self.len > 0 {
            self.len -= 1;
            true
        } else {
            false
        }
    }

    /// Clear buffer
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Get buffer as string slice, if it is valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(self.as_bytes()).ok()
    }

    /// Cursor position (number of valid bytes)
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if another byte would be dropped
    pub fn is_full(&self) -> bool {
        self.len == M - 1
    }

    /// Largest line the buffer holds
    pub const fn capacity(&self) -> usize {
        M - 1
    }

    /// Get raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl<const M: usize> Default for LineBuffer<M> {
    fn default() -> Self {
        Self::new()
    }
}
