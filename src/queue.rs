//! Output byte queue
//!
//! Fixed-capacity ring between the bit sampler (producer) and the request
//! handler (consumer). Both sides run inside the same dispatch loop, so
//! plain indices are enough; no atomics.
//!
//! Indices stay in `[0, N)` and wrap modulo `N`. A separate `empty` flag
//! disambiguates `read == write` (empty vs. full).

use crate::config::QUEUE_CAPACITY;

/// Byte ring buffer with static size.
///
/// `N` need not be a power of 2.
pub struct ByteQueue<const N: usize = QUEUE_CAPACITY> {
    slots: [u8; N],
    write_idx: usize,
    read_idx: usize,
    empty: bool,
    /// Unread bytes lost to overwrite since creation.
    overruns: u32,
}

impl<const N: usize> ByteQueue<N> {
    /// Create new empty queue
    pub const fn new() -> Self {
        const { assert!(N > 0, "Queue capacity must be non-zero") };

        Self {
            slots: [0u8; N],
            write_idx: 0,
            read_idx: 0,
            empty: true,
            overruns: 0,
        }
    }

    /// Push a byte.
    ///
    /// Never blocks. If the queue is full, the oldest unread byte is
    /// overwritten and the read index moves past it.
    ///
    /// Returns `true` if an unread byte was lost.
    #[inline]
    pub fn push(&mut self, byte: u8) -> bool {
        let overwrote = self.is_full();

        self.slots[self.write_idx] = byte;
        self.write_idx = (self.write_idx + 1) % N;

        if overwrote {
            // Oldest byte is gone, keep reader pointing at the next-oldest.
            self.read_idx = self.write_idx;
            self.overruns = self.overruns.saturating_add(1);
        }

        self.empty = false;
        overwrote
    }

    /// Pop the oldest unread byte.
    ///
    /// Returns None if queue is empty.
    #[inline]
    pub fn pop(&mut self) -> Option<u8> {
        if self.empty {
            return None;
        }

        let byte = self.slots[self.read_idx];
        self.read_idx = (self.read_idx + 1) % N;
        self.empty = self.read_idx == self.write_idx;
        Some(byte)
    }

    /// Check if queue is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Check if the next push would overwrite
    #[inline]
    pub fn is_full(&self) -> bool {
        !self.empty && self.write_idx == self.read_idx
    }

    /// Get number of unread bytes
    #[inline]
    pub fn len(&self) -> usize {
        if self.empty {
            0
        } else if self.write_idx > self.read_idx {
            self.write_idx - self.read_idx
        } else {
            N - self.read_idx + self.write_idx
        }
    }

    /// Get buffer capacity
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Get count of bytes lost to overwrite
    #[inline]
    pub fn overruns(&self) -> u32 {
        self.overruns
    }

    #[inline]
    pub fn write_idx(&self) -> usize {
        self.write_idx
    }

    #[inline]
    pub fn read_idx(&self) -> usize {
        self.read_idx
    }
}

impl<const N: usize> Default for ByteQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
