//! Lock-free SPSC byte queue between the RX interrupt and the poll loop.
//!
//! # Architecture
//!
//! ```text
//! RX ISR ──push──▶ ByteIngestQueue ──pop──▶ process_pending()
//!  (producer)       (lock-free)              (consumer)
//! ```
//!
//! # Rules
//!
//! - Only the producer writes `head`, only the consumer writes `tail`
//! - The slot is written before `head` is published (Release)
//! - Push never blocks: when full the incoming byte is dropped (drop-newest)

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use crate::config::RX_BUFFER_SIZE;

/// Result of pushing a byte from interrupt context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PushOutcome {
    /// Byte stored.
    Queued,
    /// Queue full, byte discarded. Already-queued bytes are untouched.
    Dropped,
}

/// Fixed-capacity ring of received bytes.
///
/// Holds at most `N - 1` bytes: empty iff `head == tail`, full iff
/// `head + 1 == tail` (mod N).
///
/// # Safety
///
/// This type uses `UnsafeCell` internally but is safe to use because:
/// - Single producer (RX interrupt) writes only the slot at `head`
/// - Single consumer (poll loop) reads only the slot at `tail`
/// - A slot is never both, since `head` stops one short of `tail`
///
/// # Memory Ordering
///
/// - Producer stores `head` with `Release` after writing the slot
/// - Consumer loads `head` with `Acquire` before reading the slot
/// - The mirror pair on `tail` hands freed slots back to the producer
pub struct ByteIngestQueue<const N: usize = RX_BUFFER_SIZE> {
    slots: UnsafeCell<[u8; N]>,

    /// Next write slot (producer-owned).
    head: AtomicUsize,

    /// Next read slot (consumer-owned).
    tail: AtomicUsize,

    /// Bytes discarded because the queue was full.
    dropped: AtomicU32,
}

// SAFETY: Single producer, single consumer, atomic coordination.
unsafe impl<const N: usize> Sync for ByteIngestQueue<N> {}
unsafe impl<const N: usize> Send for ByteIngestQueue<N> {}

impl<const N: usize> ByteIngestQueue<N> {
    /// Mask for wrapping index to buffer size.
    const MASK: usize = N - 1;

    /// Create a new empty queue.
    ///
    /// # Panics
    ///
    /// Panics at compile time if N is not a power of 2 (or is 1).
    pub const fn new() -> Self {
        const { assert!(N.is_power_of_two() && N >= 2, "Queue size must be power of 2") };

        Self {
            slots: UnsafeCell::new([0u8; N]),
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Push a byte (producer side, interrupt context).
    ///
    /// Never blocks. Returns `PushOutcome::Dropped` and leaves `head`
    /// unchanged when the queue is full.
    ///
    /// # Safety
    ///
    /// Not marked `unsafe`, but callers must keep to one producer: only the
    /// RX interrupt (or the one thread playing it) may push. Two concurrent
    /// pushers race on the same slot.
    #[inline]
    pub fn push(&self, byte: u8) -> PushOutcome {
        let head = self.head.load(Ordering::Relaxed);
        let next = (head + 1) & Self::MASK;

        if next == self.tail.load(Ordering::Acquire) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return PushOutcome::Dropped;
        }

        // SAFETY: Single producer; the consumer never reads `head` until it
        // is published below.
        unsafe {
            self.slots.get().cast::<u8>().add(head).write(byte);
        }

        self.head.store(next, Ordering::Release);
        PushOutcome::Queued
    }

    /// Pop the oldest byte (consumer side, poll context).
    ///
    /// # Safety
    ///
    /// Not marked `unsafe`, but callers must keep to one consumer: only the
    /// poll loop may pop. Two concurrent poppers can return the same byte.
    #[inline]
    pub fn pop(&self) -> Option<u8> {
        let tail = self.tail.load(Ordering::Relaxed);

        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: Single consumer; the producer never writes `tail` while
        // it is behind `head`.
        let byte = unsafe { self.slots.get().cast::<u8>().add(tail).read() };

        self.tail.store((tail + 1) & Self::MASK, Ordering::Release);
        Some(byte)
    }

    /// Number of queued bytes. Only a snapshot when called concurrently.
    #[inline]
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        head.wrapping_sub(tail) & Self::MASK
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == Self::usable_capacity()
    }

    /// Slot count (N).
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Maximum number of bytes held at once (N - 1).
    #[inline]
    pub const fn usable_capacity() -> usize {
        N - 1
    }

    /// Total bytes dropped on overflow since boot.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl<const N: usize> Default for ByteIngestQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_empty_pop() {
        let q = ByteIngestQueue::<8>::new();
        assert!(q.is_empty());
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn test_queue_full_keeps_head() {
        let q = ByteIngestQueue::<4>::new();

        assert_eq!(q.push(1), PushOutcome::Queued);
        assert_eq!(q.push(2), PushOutcome::Queued);
        assert_eq!(q.push(3), PushOutcome::Queued);
        assert!(q.is_full());
        assert_eq!(q.push(4), PushOutcome::Dropped);
        assert_eq!(q.len(), 3);
        assert_eq!(q.dropped(), 1);

        assert_eq!(q.pop(), Some(1));
        assert_eq!(q.push(5), PushOutcome::Queued);
        assert_eq!(q.pop(), Some(2));
        assert_eq!(q.pop(), Some(3));
        assert_eq!(q.pop(), Some(5));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn test_queue_len_across_wrap() {
        let q = ByteIngestQueue::<4>::new();

        for round in 0..10u8 {
            q.push(round);
            q.push(round.wrapping_add(1));
            assert_eq!(q.len(), 2);
            q.pop();
            q.pop();
            assert_eq!(q.len(), 0);
        }
    }
}
