//! RT-safe logging for the receiver.
//!
//! ```text
//! Receiver loop          LogStream            UART log task
//! ─────────────          ─────────            ─────────────
//!
//! rt_debug!() ────────▶ [L0][L1][L2] ──────▶ UART TX
//! ~100ns                 lock-free           blocking ok
//! non-blocking           SPSC ring
//! ```
//!
//! The receiver loop must never wait on log output: a full ring drops the
//! message and counts it. Messages below the stream's level are discarded
//! before formatting.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};

/// Maximum message length.
pub const MAX_MSG_LEN: usize = 96;

/// Log buffer size (number of entries).
pub const LOG_BUFFER_SIZE: usize = 64;

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl LogLevel {
    /// Convert to string for output.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }

    /// Convert from raw u8 value (out of range saturates to Trace).
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Error,
            1 => LogLevel::Warn,
            2 => LogLevel::Info,
            3 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

/// A single log entry.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct LogEntry {
    /// Timestamp in nanoseconds (receiver time base).
    pub timestamp_ns: i64,
    pub level: LogLevel,
    /// Message length.
    pub len: u8,
    /// Message bytes (not null-terminated).
    pub msg: [u8; MAX_MSG_LEN],
}

impl LogEntry {
    const EMPTY: Self = Self {
        timestamp_ns: 0,
        level: LogLevel::Info,
        len: 0,
        msg: [0; MAX_MSG_LEN],
    };

    /// Message text (lossy: invalid UTF-8 yields a placeholder).
    pub fn text(&self) -> &str {
        core::str::from_utf8(&self.msg[..self.len as usize]).unwrap_or("<invalid utf8>")
    }
}

impl Default for LogEntry {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Lock-free log stream (single producer, single consumer).
pub struct LogStream<const N: usize = LOG_BUFFER_SIZE> {
    entries: UnsafeCell<[LogEntry; N]>,
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
    level: AtomicU8,
}

// SAFETY: One producer task, one consumer task. The producer only touches
// the slot at `write_idx` before publishing it with Release; the consumer
// only touches the slot at `read_idx` after observing it with Acquire.
unsafe impl<const N: usize> Sync for LogStream<N> {}
unsafe impl<const N: usize> Send for LogStream<N> {}

impl<const N: usize> LogStream<N> {
    const MASK: usize = N - 1;

    /// Create a new empty log stream passing `Info` and above.
    pub const fn new() -> Self {
        Self::with_level(LogLevel::Info)
    }

    /// Create a new empty log stream with the given level filter.
    pub const fn with_level(level: LogLevel) -> Self {
        assert!(N.is_power_of_two(), "Log buffer size must be power of 2");

        Self {
            entries: UnsafeCell::new([LogEntry::EMPTY; N]),
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
            level: AtomicU8::new(level as u8),
        }
    }

    /// Check whether a message at `level` would be kept.
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level as u8 <= self.level.load(Ordering::Relaxed)
    }

    /// Change the level filter.
    #[inline]
    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    #[inline]
    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::Relaxed))
    }

    /// Push a log entry (RT-safe, never blocks).
    ///
    /// Returns `true` if message was queued, `false` if filtered or dropped
    /// (ring full). Only drops are counted.
    #[inline]
    pub fn push(&self, timestamp_ns: i64, level: LogLevel, msg: &[u8]) -> bool {
        if !self.enabled(level) {
            return false;
        }

        let write = self.write_idx.load(Ordering::Relaxed);
        let read = self.read_idx.load(Ordering::Acquire);

        if write.wrapping_sub(read) >= N as u32 {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        let idx = (write as usize) & Self::MASK;

        // SAFETY: Single producer. The consumer will not read this slot
        // until write_idx is advanced below.
        unsafe {
            let entry = &mut (*self.entries.get())[idx];
            entry.timestamp_ns = timestamp_ns;
            entry.level = level;
            entry.len = msg.len().min(MAX_MSG_LEN) as u8;
            entry.msg[..entry.len as usize].copy_from_slice(&msg[..entry.len as usize]);
        }

        self.write_idx.store(write.wrapping_add(1), Ordering::Release);
        true
    }

    /// Drain next log entry (for the log task).
    ///
    /// Returns `None` if no entries available.
    #[inline]
    pub fn drain(&self) -> Option<LogEntry> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);

        if read == write {
            return None;
        }

        let idx = (read as usize) & Self::MASK;

        // SAFETY: Single consumer, slot published by the Acquire load above.
        let entry = unsafe { (*self.entries.get())[idx] };

        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(entry)
    }

    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Reset dropped counter (e.g., after reporting).
    #[inline]
    pub fn reset_dropped(&self) {
        self.dropped.store(0, Ordering::Relaxed);
    }

    #[inline]
    pub fn has_entries(&self) -> bool {
        self.pending() != 0
    }

    /// Get number of entries waiting to be drained.
    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }
}

impl<const N: usize> Default for LogStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-buffer `core::fmt::Write` sink. Truncates silently when full.
pub struct BufWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> BufWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos == 0
    }
}

impl core::fmt::Write for BufWriter<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let bytes = s.as_bytes();
        let to_write = bytes.len().min(self.buf.len() - self.pos);
        self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
        self.pos += to_write;
        Ok(())
    }
}

/// Format a message into a buffer.
///
/// Returns the number of bytes written.
#[inline]
pub fn format_to_buffer(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    let mut writer = BufWriter::new(buf);
    let _ = core::fmt::write(&mut writer, args);
    writer.len()
}

/// RT-safe log macro.
///
/// Skips formatting entirely when the stream filters `$level` out.
///
/// # Example
///
/// ```ignore
/// rt_log!(LogLevel::Debug, RX_LOG_STREAM, now_ns, "byte 0x{:02X}", byte);
/// ```
#[macro_export]
macro_rules! rt_log {
    ($level:expr, $stream:expr, $timestamp:expr, $($arg:tt)*) => {{
        let level = $level;
        if $stream.enabled(level) {
            let mut buf = [0u8; $crate::logging::MAX_MSG_LEN];
            let len = $crate::logging::format_to_buffer(&mut buf, format_args!($($arg)*));
            $stream.push($timestamp, level, &buf[..len]);
        }
    }};
}

/// RT-safe info log.
#[macro_export]
macro_rules! rt_info {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Info, $stream, $timestamp, $($arg)*)
    };
}

/// RT-safe warning log.
#[macro_export]
macro_rules! rt_warn {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Warn, $stream, $timestamp, $($arg)*)
    };
}

/// RT-safe error log.
#[macro_export]
macro_rules! rt_error {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Error, $stream, $timestamp, $($arg)*)
    };
}

/// RT-safe debug log.
#[macro_export]
macro_rules! rt_debug {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Debug, $stream, $timestamp, $($arg)*)
    };
}

/// RT-safe trace log (maximum verbosity).
#[macro_export]
macro_rules! rt_trace {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Trace, $stream, $timestamp, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_stream_basic() {
        let stream = LogStream::<16>::new();

        assert!(stream.push(1000, LogLevel::Info, b"test message"));
        assert!(stream.has_entries());
        assert_eq!(stream.pending(), 1);

        let entry = stream.drain().unwrap();
        assert_eq!(entry.timestamp_ns, 1000);
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.text(), "test message");

        assert!(!stream.has_entries());
    }

    #[test]
    fn test_log_stream_full() {
        let stream = LogStream::<4>::new();

        assert!(stream.push(1, LogLevel::Info, b"1"));
        assert!(stream.push(2, LogLevel::Info, b"2"));
        assert!(stream.push(3, LogLevel::Info, b"3"));
        assert!(stream.push(4, LogLevel::Info, b"4"));

        // Should drop
        assert!(!stream.push(5, LogLevel::Info, b"5"));
        assert_eq!(stream.dropped(), 1);
        assert_eq!(stream.pending(), 4);

        // Drain one, should be able to push again
        assert_eq!(stream.drain().unwrap().timestamp_ns, 1);
        assert!(stream.push(6, LogLevel::Info, b"6"));

        let order: std::vec::Vec<i64> =
            core::iter::from_fn(|| stream.drain()).map(|e| e.timestamp_ns).collect();
        assert_eq!(order, [2, 3, 4, 6]);
    }

    #[test]
    fn test_level_filter() {
        let stream = LogStream::<8>::with_level(LogLevel::Warn);

        assert!(!stream.push(0, LogLevel::Debug, b"quiet"));
        assert!(stream.push(0, LogLevel::Error, b"loud"));
        assert_eq!(stream.dropped(), 0);

        stream.set_level(LogLevel::Trace);
        assert_eq!(stream.level(), LogLevel::Trace);
        assert!(stream.push(0, LogLevel::Trace, b"now visible"));
        assert_eq!(stream.pending(), 2);
    }

    #[test]
    fn test_macro_skips_filtered() {
        let stream = LogStream::<8>::new();

        crate::rt_debug!(stream, 5, "hidden {}", 1);
        crate::rt_warn!(stream, 6, "late by {} ns", 1200);

        assert_eq!(stream.pending(), 1);
        let entry = stream.drain().unwrap();
        assert_eq!(entry.level, LogLevel::Warn);
        assert_eq!(entry.text(), "late by 1200 ns");
    }

    #[test]
    fn test_format_to_buffer_truncates() {
        let mut buf = [0u8; 8];
        let len = format_to_buffer(&mut buf, format_args!("Hello {}", 42_000));
        assert_eq!(&buf[..len], b"Hello 42");
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Trace);
    }

    #[test]
    fn test_spsc_cross_thread() {
        use std::sync::Arc;
        use std::thread;

        let stream = Arc::new(LogStream::<16>::with_level(LogLevel::Trace));

        let producer = {
            let stream = Arc::clone(&stream);
            thread::spawn(move || {
                let mut sent = 0u32;
                while sent < 200 {
                    if stream.push(sent as i64, LogLevel::Trace, b"x") {
                        sent += 1;
                    } else {
                        thread::yield_now();
                    }
                }
            })
        };

        // Entries arrive in order, none missing
        let mut expected = 0i64;
        while expected < 200 {
            match stream.drain() {
                Some(entry) => {
                    assert_eq!(entry.timestamp_ns, expected);
                    expected += 1;
                }
                None => thread::yield_now(),
            }
        }

        producer.join().unwrap();
    }
}
