//! Error types

/// Receiver configuration error with code and message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// E01: Baud rate is zero
    ZeroBaud,
    /// E02: Bit period shorter than the sampler can resolve
    BaudTooHigh,
}

impl ConfigError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ZeroBaud => "E01",
            Self::BaudTooHigh => "E02",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::ZeroBaud => "baud rate must be non-zero",
            Self::BaudTooHigh => "bit period too short",
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}
