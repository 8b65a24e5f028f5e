//! # SoftUartRx
//!
//! Software UART receiver: no UART peripheral, just a GPIO sampled at the
//! right instants.
//!
//! ## Architecture
//!
//! One non-preemptible loop ([`Dispatcher`]) owns all receiver state:
//! - [`Receiver`]: start-edge detector + bit sampler (8N1, LSB first)
//! - [`ByteQueue`]: 10-byte ring, overwrites oldest on overrun
//! - [`ByteChannel`]: request/reply handoff to one consumer task
//!
//! The loop never waits on the consumer or the logger. Anomalies go to
//! [`FaultState`] and the log stream, never to the consumer.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod dispatch;
pub mod error;
pub mod fault;
pub mod hal;
pub mod handoff;
pub mod line;
pub mod log_globals;
pub mod logging;
pub mod queue;
pub mod receiver;
pub mod sim;
pub mod uart_logger;

pub use config::{RxConfig, QUEUE_CAPACITY};
pub use dispatch::{Dispatcher, Event, RxStats};
pub use error::ConfigError;
pub use fault::{FaultCode, FaultState};
pub use handoff::ByteChannel;
pub use line::Level;
pub use log_globals::{BG_LOG_STREAM, RX_LOG_STREAM};
pub use queue::ByteQueue;
pub use receiver::{Framing, Receiver};
