//! Global log stream instances.
//!
//! One stream per producing task, single consumer (UART log task).

use crate::logging::LogStream;

/// Receiver log stream (receiver loop only).
pub static RX_LOG_STREAM: LogStream = LogStream::new();

/// Background log stream (consumer task only).
pub static BG_LOG_STREAM: LogStream = LogStream::new();
