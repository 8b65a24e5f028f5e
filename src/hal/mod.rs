//! Hardware Abstraction Layer for the receiver.
//!
//! Thin wrappers around ESP-IDF peripherals.
//! Receiver logic stays in core modules, HAL is just I/O.

pub mod gpio;

pub use gpio::RxPinConfig;
#[cfg(target_os = "espidf")]
pub use gpio::RxPin;
