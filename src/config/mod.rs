//! Module: config
//!
//! Purpose: Fixed receiver configuration. Baud rate and line polarity are set
//! once at construction; there is no runtime reconfiguration.
//!
//! Architecture:
//! - All timestamps are `i64` nanoseconds from a monotonic clock
//! - Bit period is integer nanoseconds (`1e9 / baud`)
//! - First sample lands at 1.5 bit periods after the start edge (middle of bit 0)
//!
//! Safety: Safe. Const-evaluable, no interior mutability.

use crate::error::ConfigError;
use crate::line::Level;

/// Nanoseconds per second.
pub const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Default line rate.
pub const DEFAULT_BAUD: u32 = 115_200;

/// Output queue depth (bytes).
pub const QUEUE_CAPACITY: usize = 10;

/// Shortest bit period the sampler accepts (1 µs, i.e. 1 Mbaud).
pub const MIN_BIT_PERIOD_NS: i64 = 1_000;

/// Receiver configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RxConfig {
    /// Line rate in bits per second.
    baud: u32,

    /// Level the line rests at between frames (also the level of a `1` bit).
    idle_level: Level,

    /// How far past its deadline a sample may be serviced before it is
    /// recorded as late.
    late_tolerance_ns: i64,
}

impl RxConfig {
    /// Default configuration: 115200 baud, idle-high line.
    pub const DEFAULT: Self = Self {
        baud: DEFAULT_BAUD,
        idle_level: Level::High,
        late_tolerance_ns: (NANOS_PER_SEC / DEFAULT_BAUD as i64) / 4,
    };

    /// Create config for given baud rate with an idle-high line.
    ///
    /// Late tolerance defaults to a quarter bit period.
    pub const fn new(baud: u32) -> Result<Self, ConfigError> {
        if baud == 0 {
            return Err(ConfigError::ZeroBaud);
        }
        let bit_period = NANOS_PER_SEC / baud as i64;
        if bit_period < MIN_BIT_PERIOD_NS {
            return Err(ConfigError::BaudTooHigh);
        }
        Ok(Self {
            baud,
            idle_level: Level::High,
            late_tolerance_ns: bit_period / 4,
        })
    }

    /// Use an inverted line (pass `Level::Low` for a line idling low).
    pub const fn with_idle_level(mut self, idle_level: Level) -> Self {
        self.idle_level = idle_level;
        self
    }

    /// Override the late-sample tolerance.
    pub const fn with_late_tolerance_ns(mut self, tolerance_ns: i64) -> Self {
        self.late_tolerance_ns = tolerance_ns;
        self
    }

    #[inline]
    pub const fn baud(&self) -> u32 {
        self.baud
    }

    #[inline]
    pub const fn idle_level(&self) -> Level {
        self.idle_level
    }

    /// Level that marks a start bit.
    #[inline]
    pub const fn active_level(&self) -> Level {
        self.idle_level.opposite()
    }

    #[inline]
    pub const fn late_tolerance_ns(&self) -> i64 {
        self.late_tolerance_ns
    }

    /// Duration of one bit in nanoseconds.
    #[inline]
    pub const fn bit_period_ns(&self) -> i64 {
        NANOS_PER_SEC / self.baud as i64
    }

    /// Offset from the start edge to the middle of data bit 0 (1.5 bit periods).
    #[inline]
    pub const fn first_sample_offset_ns(&self) -> i64 {
        let period = self.bit_period_ns();
        period + period / 2
    }

    /// Convert a sampled level to a data bit (mark = 1).
    #[inline]
    pub const fn bit_value(&self, level: Level) -> bool {
        matches!(
            (level, self.idle_level),
            (Level::High, Level::High) | (Level::Low, Level::Low)
        )
    }
}

impl Default for RxConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
