//! Receiver finite state machine: start-edge detector and bit sampler.
//!
//! Pure logic, no hardware dependencies. Consumes line levels at
//! caller-chosen instants, produces assembled bytes. Fully testable on host.
//!
//! # Timing
//!
//! ```text
//!  idle  start   b0    b1    b2    b3    b4    b5    b6    b7   stop
//! ‾‾‾‾‾‾|_____|‾‾‾‾‾|_____|‾‾‾‾‾|_____|‾‾‾‾‾|_____|‾‾‾‾‾|_____|‾‾‾‾‾‾
//!       T        ^     ^     ^     ^     ^     ^     ^     ^
//!            T+1.5P  +P    +P    +P    +P    +P    +P  T+8.5P
//! ```
//!
//! Each deadline is the previous deadline plus one bit period, so rounding
//! in the caller's scheduling never accumulates across a byte.

use crate::config::RxConfig;
use crate::line::Level;

/// Framing state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Framing {
    /// Waiting for a start edge.
    Idle,
    /// Sampling data bits of the current byte.
    Receiving,
}

/// Result of servicing one sample deadline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sample {
    /// Data bit just recorded.
    pub bit: bool,
    /// Assembled byte, present on the 8th sample only.
    pub byte: Option<u8>,
    /// How far past the deadline the sample was taken (ns, >= 0).
    pub lateness_ns: i64,
}

/// Software UART receiver.
///
/// # Example
///
/// ```
/// use soft_uart_rx::config::RxConfig;
/// use soft_uart_rx::line::Level;
/// use soft_uart_rx::receiver::Receiver;
///
/// let config = RxConfig::new(9600).unwrap();
/// let period = config.bit_period_ns();
/// let mut rx = Receiver::new(config);
///
/// // Start edge at t = 0
/// assert!(rx.start_edge(0, Level::Low));
///
/// // 0x41 = 0b0100_0001, LSB first
/// let bits = [1, 0, 0, 0, 0, 0, 1, 0];
/// let mut byte = None;
/// for (i, bit) in bits.iter().enumerate() {
///     let t = config.first_sample_offset_ns() + i as i64 * period;
///     byte = rx.sample(t, Level::from_bool(*bit == 1)).and_then(|s| s.byte);
/// }
/// assert_eq!(byte, Some(0x41));
/// ```
pub struct Receiver {
    config: RxConfig,

    // FSM state
    framing: Framing,
    bits_received: u8,
    partial_byte: u8,
    next_sample_deadline: i64,

    // Edge detection
    last_level: Level,
}

impl Receiver {
    /// Bits per frame payload.
    pub const DATA_BITS: u8 = 8;

    /// Create an idle receiver.
    ///
    /// The line is assumed to be idle at startup.
    pub fn new(config: RxConfig) -> Self {
        Self {
            config,
            framing: Framing::Idle,
            bits_received: 0,
            partial_byte: 0,
            next_sample_deadline: 0,
            last_level: config.idle_level(),
        }
    }

    /// Get configuration.
    pub fn config(&self) -> &RxConfig {
        &self.config
    }

    #[inline]
    pub fn framing(&self) -> Framing {
        self.framing
    }

    #[inline]
    pub fn is_receiving(&self) -> bool {
        self.framing == Framing::Receiving
    }

    #[inline]
    pub fn bits_received(&self) -> u8 {
        self.bits_received
    }

    #[inline]
    pub fn partial_byte(&self) -> u8 {
        self.partial_byte
    }

    /// Deadline of the next bit sample, if a byte is in progress.
    #[inline]
    pub fn next_sample_deadline(&self) -> Option<i64> {
        match self.framing {
            Framing::Receiving => Some(self.next_sample_deadline),
            Framing::Idle => None,
        }
    }

    /// Guard for the edge detector: idle, and the line just moved from idle
    /// level to the start-bit level.
    #[inline]
    pub fn edge_ready(&self, level: Level) -> bool {
        self.framing == Framing::Idle
            && self.last_level == self.config.idle_level()
            && level == self.config.active_level()
    }

    /// Guard for the bit sampler: receiving, and the deadline has arrived.
    #[inline]
    pub fn sample_due(&self, now_ns: i64) -> bool {
        self.framing == Framing::Receiving && now_ns >= self.next_sample_deadline
    }

    /// Record the line level seen this iteration (for edge detection).
    #[inline]
    pub fn observe(&mut self, level: Level) {
        self.last_level = level;
    }

    /// Edge detector.
    ///
    /// Arms the sampler if `edge_ready(level)` holds. Returns `true` if a new
    /// byte was started.
    pub fn start_edge(&mut self, now_ns: i64, level: Level) -> bool {
        let fired = self.edge_ready(level);
        if fired {
            self.framing = Framing::Receiving;
            self.bits_received = 0;
            self.next_sample_deadline = now_ns + self.config.first_sample_offset_ns();
        }
        self.observe(level);
        fired
    }

    /// Bit sampler.
    ///
    /// Records one data bit if `sample_due(now_ns)` holds, otherwise returns
    /// `None` and leaves state untouched.
    pub fn sample(&mut self, now_ns: i64, level: Level) -> Option<Sample> {
        if !self.sample_due(now_ns) {
            return None;
        }

        let bit = self.config.bit_value(level);
        self.partial_byte = (self.partial_byte >> 1) | ((bit as u8) << 7);
        self.bits_received += 1;
        let lateness_ns = now_ns - self.next_sample_deadline;
        self.observe(level);

        let byte = if self.bits_received == Self::DATA_BITS {
            self.framing = Framing::Idle;
            Some(self.partial_byte)
        } else {
            self.next_sample_deadline += self.config.bit_period_ns();
            None
        };

        Some(Sample {
            bit,
            byte,
            lateness_ns,
        })
    }

    /// Tick the FSM with the current line level.
    ///
    /// Runs whichever of edge detector or bit sampler is eligible (at most
    /// one), then records the level. Returns a byte when one completes.
    #[inline]
    pub fn tick(&mut self, now_ns: i64, level: Level) -> Option<u8> {
        match self.framing {
            Framing::Idle => {
                self.start_edge(now_ns, level);
                None
            }
            Framing::Receiving => match self.sample(now_ns, level) {
                Some(sample) => sample.byte,
                None => {
                    self.observe(level);
                    None
                }
            },
        }
    }
}
