//! Module: line
//!
//! Purpose: Logic level of the serial input line. The receiver only ever sees
//! the line as "the level at this instant"; everything else (edges, bits,
//! bytes) is derived from a sequence of these observations.
//!
//! Safety: Safe. No unsafe blocks. Copy types only.

/// Logic level of the RX line at one sampling instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// Line driven low (space on a non-inverted line).
    Low,
    /// Line driven high (mark on a non-inverted line).
    High,
}

impl Level {
    /// Convert a raw pin reading (`true` = high).
    #[inline]
    pub const fn from_bool(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }

    /// Check if the line is high.
    #[inline]
    pub const fn is_high(self) -> bool {
        matches!(self, Level::High)
    }

    /// Check if the line is low.
    #[inline]
    pub const fn is_low(self) -> bool {
        matches!(self, Level::Low)
    }

    /// Get the opposite level.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl Default for Level {
    /// A standard UART line idles high.
    fn default() -> Self {
        Level::High
    }
}

// ============================================================================
// Tests
// ============================================================================
