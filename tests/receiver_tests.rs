//! Edge detector and bit sampler tests

mod common;

use soft_uart_rx::logging::LogStream;
use soft_uart_rx::sim::SimLine;
use soft_uart_rx::{ByteChannel, Dispatcher, Event, FaultState, Level, Receiver};

#[test]
fn test_lsb_first_sample_order() {
    let config = common::config();
    let mut rx = Receiver::new(config);

    assert!(rx.start_edge(0, Level::Low));

    let samples = [1, 0, 1, 1, 0, 0, 0, 0];
    let mut byte = None;
    for bit in samples {
        let t = rx.next_sample_deadline().unwrap();
        byte = rx.sample(t, Level::from_bool(bit == 1)).unwrap().byte;
    }

    assert_eq!(byte, Some(0x0D));
}

#[test]
fn test_every_byte_value_over_sim_line() {
    let config = common::config();
    let bytes: Vec<u8> = (0..=255).collect();
    let frames = common::schedule(&config, 1_000, &bytes, 1);
    let line = SimLine::new(config, &frames);

    let mut rx = Receiver::new(config);
    let mut got = Vec::new();
    let step = config.bit_period_ns() / 10;
    let mut t = 0;
    while t < line.end_ns() {
        if let Some(b) = rx.tick(t, line.level_at(t)) {
            got.push(b);
        }
        t += step;
    }

    assert_eq!(got, bytes);
}

#[test]
fn test_byte_available_at_nine_and_half_periods() {
    let config = common::config();
    let period = config.bit_period_ns();
    let t_edge = 50_000;
    let frames = [(t_edge, 0x3C)];
    let line = SimLine::new(config, &frames);

    let channel = ByteChannel::new();
    let fault = FaultState::new();
    let log = LogStream::new();
    let mut rx: Dispatcher = Dispatcher::new(config, &channel, &fault, &log);

    // Idle up to the edge, then hit each deadline exactly
    assert_eq!(rx.step(t_edge - period, line.level_at(t_edge - period)), None);
    assert_eq!(rx.step(t_edge, line.level_at(t_edge)), Some(Event::StartEdge));
    while let Some(deadline) = rx.next_wakeup() {
        rx.step(deadline, line.level_at(deadline));
    }

    // Request issued at T + 9.5P is answered immediately
    let t_req = t_edge + 9 * period + period / 2;
    assert!(channel.request());
    assert_eq!(rx.step(t_req, line.level_at(t_req)), Some(Event::Request));
    assert_eq!(channel.try_recv(), Some(0x3C));
}

#[test]
fn test_back_to_back_frames_no_gap() {
    let config = common::config();
    let bytes = [0x00, 0xFF, 0x80, 0x01, 0x55];
    let frames = common::schedule(&config, 0, &bytes, 0);
    let line = SimLine::new(config, &frames);

    let channel = ByteChannel::new();
    let fault = FaultState::new();
    let log = LogStream::new();
    let mut rx: Dispatcher = Dispatcher::new(config, &channel, &fault, &log);

    let step = config.bit_period_ns() / 16;
    common::drive(&mut rx, &line, -step, line.end_ns(), step, |_, _| {});

    assert_eq!(rx.stats().bytes_received, bytes.len() as u32);
    let mut got = Vec::new();
    for _ in 0..bytes.len() {
        assert!(channel.request());
        assert_eq!(rx.step(line.end_ns(), Level::High), Some(Event::Request));
        got.extend(channel.try_recv());
    }
    assert_eq!(got, bytes);
    assert!(rx.queue().is_empty());
}

#[test]
fn test_glitch_produces_garbage_byte_and_recovers() {
    let config = common::config();
    let period = config.bit_period_ns();

    let channel = ByteChannel::new();
    let fault = FaultState::new();
    let log = LogStream::new();
    let mut rx: Dispatcher = Dispatcher::new(config, &channel, &fault, &log);

    // A one-step low pulse arms the sampler; the line then stays idle
    rx.step(0, Level::Low);
    assert!(rx.receiver().is_receiving());
    while let Some(deadline) = rx.next_wakeup() {
        rx.step(deadline, Level::High);
    }
    assert_eq!(rx.stats().bytes_received, 1);

    // Idle again and a real frame decodes
    let start = 20 * period;
    let frames = [(start, 0x42)];
    let line = SimLine::new(config, &frames);
    let step = period / 8;
    common::drive(&mut rx, &line, start - period, line.end_ns(), step, |_, _| {});

    assert!(channel.request());
    rx.step(line.end_ns(), Level::High);
    assert_eq!(channel.try_recv(), Some(0xFF));
    assert!(channel.request());
    rx.step(line.end_ns(), Level::High);
    assert_eq!(channel.try_recv(), Some(0x42));
}
