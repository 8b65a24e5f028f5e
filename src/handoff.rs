//! Request/reply byte handoff between the receiver loop and one consumer.
//!
//! ```text
//! Consumer task               ByteChannel              Receiver loop
//! ─────────────               ───────────              ─────────────
//!
//! request() ─────────────▶ requested = true ──────▶ is_pending()?
//!                                                    queue non-empty?
//! try_recv() ◀──────────── value, ready = true ◀─── reply(pop())
//! ```
//!
//! One slot, one outstanding request. The receiver loop never waits on the
//! consumer: a pending request simply stays pending until a byte exists.
//!
//! # Memory Ordering
//!
//! - Receiver clears `requested`, stores `value`, then `ready` with `Release`
//! - Consumer loads `ready` with `Acquire` before reading `value`

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// One-slot request/reply mailbox.
pub struct ByteChannel {
    /// Consumer is waiting for a byte.
    requested: AtomicBool,

    /// A reply is in `value` and not yet taken.
    ready: AtomicBool,

    /// Reply byte.
    value: AtomicU8,
}

impl ByteChannel {
    /// Create an idle channel.
    pub const fn new() -> Self {
        Self {
            requested: AtomicBool::new(false),
            ready: AtomicBool::new(false),
            value: AtomicU8::new(0),
        }
    }

    // --- Consumer side ---

    /// Ask for the next byte.
    ///
    /// Returns `false` if a request is already outstanding or a reply is
    /// waiting to be taken (half-duplex: one exchange at a time).
    #[inline]
    pub fn request(&self) -> bool {
        if self.ready.load(Ordering::Acquire) {
            return false;
        }
        !self.requested.swap(true, Ordering::AcqRel)
    }

    /// Take the reply, if one has landed.
    #[inline]
    pub fn try_recv(&self) -> Option<u8> {
        if !self.ready.load(Ordering::Acquire) {
            return None;
        }
        let byte = self.value.load(Ordering::Relaxed);
        self.ready.store(false, Ordering::Release);
        Some(byte)
    }

    /// Request a byte and wait for it, calling `wait` between polls.
    ///
    /// `wait` is where the caller yields (task delay, spin hint, ...).
    /// The request is re-issued on every poll until a reply lands; while
    /// one is already outstanding `request()` is a no-op.
    pub fn recv_with(&self, mut wait: impl FnMut()) -> u8 {
        loop {
            if let Some(byte) = self.try_recv() {
                return byte;
            }
            self.request();
            wait();
        }
    }

    // --- Receiver side ---

    /// Guard: a request is outstanding and no reply is waiting.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.requested.load(Ordering::Acquire) && !self.ready.load(Ordering::Acquire)
    }

    /// Answer the outstanding request.
    ///
    /// `requested` is cleared before `ready` is published: once the consumer
    /// can see the reply, its next `request()` must not collide with the
    /// request being answered.
    #[inline]
    pub fn reply(&self, byte: u8) {
        self.requested.store(false, Ordering::Relaxed);
        self.value.store(byte, Ordering::Relaxed);
        self.ready.store(true, Ordering::Release);
    }
}

impl Default for ByteChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_reply() {
        let ch = ByteChannel::new();

        assert!(!ch.is_pending());
        assert!(ch.request());
        assert!(ch.is_pending());
        assert_eq!(ch.try_recv(), None);

        ch.reply(0x42);
        assert!(!ch.is_pending());
        assert_eq!(ch.try_recv(), Some(0x42));
        assert_eq!(ch.try_recv(), None);
    }

    #[test]
    fn test_single_outstanding_request() {
        let ch = ByteChannel::new();

        assert!(ch.request());
        assert!(!ch.request());

        ch.reply(1);
        // Unread reply blocks a new request
        assert!(!ch.request());
        assert_eq!(ch.try_recv(), Some(1));
        assert!(ch.request());
    }

    #[test]
    fn test_recv_with_cross_thread() {
        use std::sync::Arc;
        use std::thread;

        let ch = Arc::new(ByteChannel::new());
        let consumer = {
            let ch = Arc::clone(&ch);
            thread::spawn(move || ch.recv_with(thread::yield_now))
        };

        // Answer once the consumer has asked
        while !ch.is_pending() {
            thread::yield_now();
        }
        ch.reply(0x7E);

        assert_eq!(consumer.join().unwrap(), 0x7E);
    }

    #[test]
    fn test_request_after_reply_is_not_lost() {
        let ch = ByteChannel::new();

        assert!(ch.request());
        ch.reply(1);

        // Consumer takes the reply and asks again straight away
        assert_eq!(ch.try_recv(), Some(1));
        assert!(ch.request());
        assert!(ch.is_pending());

        ch.reply(2);
        assert_eq!(ch.try_recv(), Some(2));
    }

    #[test]
    fn test_cross_thread_exchanges_in_order() {
        use std::sync::atomic::AtomicBool;
        use std::sync::Arc;
        use std::thread;
        use std::time::{Duration, Instant};

        const EXCHANGES: u32 = 200_000;
        let deadline = Instant::now() + Duration::from_secs(60);

        let ch = Arc::new(ByteChannel::new());
        let done = Arc::new(AtomicBool::new(false));

        let producer = {
            let ch = Arc::clone(&ch);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut next = 0u32;
                while !done.load(Ordering::Acquire) {
                    assert!(Instant::now() < deadline, "consumer stalled at {}", next);
                    if ch.is_pending() {
                        ch.reply(next as u8);
                        next += 1;
                    } else {
                        thread::yield_now();
                    }
                }
                next
            })
        };

        for i in 0..EXCHANGES {
            let byte = ch.recv_with(|| {
                assert!(Instant::now() < deadline, "stalled after {} bytes", i);
                thread::yield_now();
            });
            assert_eq!(byte, i as u8, "exchange {}", i);
        }
        done.store(true, Ordering::Release);

        // At most one reply beyond what was taken (a re-issued request)
        let replied = producer.join().unwrap();
        assert!(replied == EXCHANGES || replied == EXCHANGES + 1);
    }
}
