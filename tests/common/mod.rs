//! Shared helpers for integration tests.

#![allow(dead_code)]

use soft_uart_rx::sim::SimLine;
use soft_uart_rx::{Dispatcher, Level, RxConfig};

/// 9600 baud, idle-high.
pub fn config() -> RxConfig {
    RxConfig::new(9600).unwrap()
}

/// Schedule `bytes` as frames starting at `start`, separated by `gap_bits`
/// idle bit periods.
pub fn schedule(config: &RxConfig, start: i64, bytes: &[u8], gap_bits: i64) -> Vec<(i64, u8)> {
    let period = config.bit_period_ns();
    let spacing = (10 + gap_bits) * period;
    bytes
        .iter()
        .enumerate()
        .map(|(i, &b)| (start + i as i64 * spacing, b))
        .collect()
}

/// Step the dispatcher over `[from, to)` every `step` ns, reading the line
/// from `line`. `each` runs after every iteration with the current time.
pub fn drive(
    rx: &mut Dispatcher<'_>,
    line: &SimLine<'_>,
    from: i64,
    to: i64,
    step: i64,
    mut each: impl FnMut(&mut Dispatcher<'_>, i64),
) {
    let mut t = from;
    while t < to {
        rx.step(t, line.level_at(t));
        each(rx, t);
        t += step;
    }
}

/// Clock one idle-high 8N1 frame into the dispatcher starting at `t0`,
/// hitting each sample deadline exactly. Returns the end of the stop bit.
pub fn send_frame(rx: &mut Dispatcher<'_>, t0: i64, byte: u8) -> i64 {
    let period = rx.receiver().config().bit_period_ns();

    rx.step(t0, Level::Low);
    while let Some(deadline) = rx.next_wakeup() {
        let bit = rx.receiver().bits_received();
        rx.step(deadline, Level::from_bool((byte >> bit) & 1 == 1));
    }
    rx.step(t0 + 9 * period + period / 2, Level::High);
    t0 + 10 * period
}
