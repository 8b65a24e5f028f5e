//! Diagnostic fault record for the receiver.
//!
//! Faults never stop the receiver and are never reported to the byte
//! consumer. The sampler cannot wait, so an overrun or a late sample is
//! only written down here for whoever inspects the record.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

/// Fault codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FaultCode {
    /// No fault (normal operation).
    None = 0,

    /// Output queue overrun: an unread byte was overwritten.
    /// Data: total bytes overwritten so far.
    Overrun = 1,

    /// A bit was sampled later than the configured tolerance.
    /// Data: lateness in nanoseconds (saturated).
    LateSample = 2,
}

impl FaultCode {
    /// Convert from raw u8 value.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => FaultCode::Overrun,
            2 => FaultCode::LateSample,
            _ => FaultCode::None,
        }
    }
}

/// Thread-safe fault state.
///
/// Written by the receiver loop, read by anyone.
///
/// # Usage
///
/// ```
/// use soft_uart_rx::fault::{FaultCode, FaultState};
///
/// static FAULT: FaultState = FaultState::new();
///
/// FAULT.set(FaultCode::Overrun, 1);
/// assert!(FAULT.is_active());
/// assert_eq!(FAULT.overruns(), 1);
///
/// FAULT.clear();
/// assert_eq!(FAULT.count(), 1);
/// ```
pub struct FaultState {
    /// True if a fault was recorded since the last `clear()`.
    active: AtomicBool,

    /// Most recent fault code.
    code: AtomicU8,

    /// Data for the most recent fault.
    data: AtomicU32,

    /// Total fault count since boot (never cleared).
    count: AtomicU32,

    /// Overrun faults since boot.
    overruns: AtomicU32,

    /// Late-sample faults since boot.
    late_samples: AtomicU32,
}

impl FaultState {
    /// Create new fault state (no fault).
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
            code: AtomicU8::new(0),
            data: AtomicU32::new(0),
            count: AtomicU32::new(0),
            overruns: AtomicU32::new(0),
            late_samples: AtomicU32::new(0),
        }
    }

    /// Record a fault.
    #[inline]
    pub fn set(&self, code: FaultCode, data: u32) {
        self.code.store(code as u8, Ordering::Release);
        self.data.store(data, Ordering::Release);
        self.count.fetch_add(1, Ordering::Relaxed);
        match code {
            FaultCode::Overrun => {
                self.overruns.fetch_add(1, Ordering::Relaxed);
            }
            FaultCode::LateSample => {
                self.late_samples.fetch_add(1, Ordering::Relaxed);
            }
            FaultCode::None => {}
        }
        self.active.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Get fault code (only meaningful if `is_active()` is true).
    #[inline]
    pub fn code(&self) -> FaultCode {
        FaultCode::from_u8(self.code.load(Ordering::Acquire))
    }

    #[inline]
    pub fn data(&self) -> u32 {
        self.data.load(Ordering::Acquire)
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn overruns(&self) -> u32 {
        self.overruns.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn late_samples(&self) -> u32 {
        self.late_samples.load(Ordering::Relaxed)
    }

    /// Clear the active flag.
    ///
    /// Counters are preserved for diagnostics.
    #[inline]
    pub fn clear(&self) {
        self.active.store(false, Ordering::Release);
    }

    /// Get a snapshot of the current fault state.
    #[inline]
    pub fn snapshot(&self) -> FaultSnapshot {
        FaultSnapshot {
            active: self.is_active(),
            code: self.code(),
            data: self.data(),
            count: self.count(),
            overruns: self.overruns(),
            late_samples: self.late_samples(),
        }
    }
}

impl Default for FaultState {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of fault state at a point in time.
#[derive(Clone, Copy, Debug)]
pub struct FaultSnapshot {
    pub active: bool,
    pub code: FaultCode,
    pub data: u32,
    pub count: u32,
    pub overruns: u32,
    pub late_samples: u32,
}
