//! Single-threaded event dispatcher for the receiver task.
//!
//! Each iteration evaluates three guard predicates against the shared state
//! and services exactly one eligible event:
//!
//! | Event       | Guard                                   |
//! |-------------|-----------------------------------------|
//! | `SampleDue` | receiving, `now >= next_sample_deadline` |
//! | `StartEdge` | idle, line moved idle → active          |
//! | `Request`   | consumer waiting, queue not empty       |
//!
//! `SampleDue` and `StartEdge` exclude each other. When a request is also
//! eligible, the line event goes first: a byte handed out one iteration
//! later costs nothing, a missed deadline costs a byte.
//!
//! Servicing never suspends, so receiver state and queue indices are never
//! seen half-updated and need no locking.

use crate::config::{RxConfig, QUEUE_CAPACITY};
use crate::fault::{FaultCode, FaultState};
use crate::handoff::ByteChannel;
use crate::line::Level;
use crate::logging::LogStream;
use crate::queue::ByteQueue;
use crate::receiver::Receiver;
use crate::{rt_debug, rt_trace, rt_warn};

/// Event serviced in one loop iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Start edge seen while idle; sampler armed.
    StartEdge,
    /// Bit-sample deadline reached.
    SampleDue,
    /// Consumer request answered from the queue.
    Request,
}

/// Receiver counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RxStats {
    /// Bytes assembled by the sampler.
    pub bytes_received: u32,
    /// Bytes handed to the consumer.
    pub bytes_delivered: u32,
    /// Unread bytes lost to queue overwrite.
    pub overruns: u32,
    /// Samples taken later than the configured tolerance.
    pub late_samples: u32,
}

/// Receiver task state: edge detector, bit sampler, output queue, and the
/// consumer handoff, driven by one dispatch loop.
///
/// # Example
///
/// ```ignore
/// static CHANNEL: ByteChannel = ByteChannel::new();
/// static FAULT: FaultState = FaultState::new();
///
/// let mut rx = Dispatcher::new(RxConfig::DEFAULT, &CHANNEL, &FAULT, &RX_LOG_STREAM);
///
/// loop {
///     rx.step(timestamp_ns(), read_pin());
///     wait_until(rx.next_wakeup());
/// }
/// ```
pub struct Dispatcher<'a, const N: usize = QUEUE_CAPACITY> {
    receiver: Receiver,
    queue: ByteQueue<N>,
    channel: &'a ByteChannel,
    fault: &'a FaultState,
    log: &'a LogStream,
    bytes_received: u32,
    bytes_delivered: u32,
    late_samples: u32,
}

impl<'a, const N: usize> Dispatcher<'a, N> {
    pub fn new(
        config: RxConfig,
        channel: &'a ByteChannel,
        fault: &'a FaultState,
        log: &'a LogStream,
    ) -> Self {
        Self {
            receiver: Receiver::new(config),
            queue: ByteQueue::new(),
            channel,
            fault,
            log,
            bytes_received: 0,
            bytes_delivered: 0,
            late_samples: 0,
        }
    }

    /// Evaluate guards and pick the event to service this iteration.
    #[inline]
    pub fn select(&self, now_ns: i64, level: Level) -> Option<Event> {
        if self.receiver.sample_due(now_ns) {
            Some(Event::SampleDue)
        } else if self.receiver.edge_ready(level) {
            Some(Event::StartEdge)
        } else if self.channel.is_pending() && !self.queue.is_empty() {
            Some(Event::Request)
        } else {
            None
        }
    }

    /// Run one loop iteration: select, service, record the line level.
    ///
    /// Returns the event serviced, if any.
    ///
    /// # Timing
    ///
    /// O(1), no blocking, no allocation.
    #[inline]
    pub fn step(&mut self, now_ns: i64, level: Level) -> Option<Event> {
        let event = self.select(now_ns, level);
        match event {
            Some(Event::SampleDue) => self.on_sample(now_ns, level),
            Some(Event::StartEdge) => self.on_start_edge(now_ns, level),
            Some(Event::Request) => self.on_request(now_ns),
            None => {}
        }
        self.receiver.observe(level);
        event
    }

    /// Earliest instant a timer event can become eligible.
    ///
    /// `None` while idle: the next event is an edge or a request, so the
    /// caller polls.
    #[inline]
    pub fn next_wakeup(&self) -> Option<i64> {
        self.receiver.next_sample_deadline()
    }

    pub fn stats(&self) -> RxStats {
        RxStats {
            bytes_received: self.bytes_received,
            bytes_delivered: self.bytes_delivered,
            overruns: self.queue.overruns(),
            late_samples: self.late_samples,
        }
    }

    pub fn receiver(&self) -> &Receiver {
        &self.receiver
    }

    pub fn queue(&self) -> &ByteQueue<N> {
        &self.queue
    }

    // --- Handlers ---

    fn on_start_edge(&mut self, now_ns: i64, level: Level) {
        if self.receiver.start_edge(now_ns, level) {
            rt_trace!(self.log, now_ns, "start edge");
        }
    }

    fn on_sample(&mut self, now_ns: i64, level: Level) {
        let Some(sample) = self.receiver.sample(now_ns, level) else {
            return;
        };

        if sample.lateness_ns > self.receiver.config().late_tolerance_ns() {
            self.late_samples = self.late_samples.saturating_add(1);
            let late = u32::try_from(sample.lateness_ns).unwrap_or(u32::MAX);
            self.fault.set(FaultCode::LateSample, late);
            rt_warn!(self.log, now_ns, "late sample +{} ns", sample.lateness_ns);
        }

        if let Some(byte) = sample.byte {
            self.bytes_received = self.bytes_received.wrapping_add(1);
            rt_debug!(self.log, now_ns, "rx 0x{:02X}", byte);

            if self.queue.push(byte) {
                let lost = self.queue.overruns();
                self.fault.set(FaultCode::Overrun, lost);
                rt_warn!(self.log, now_ns, "queue overrun, {} lost", lost);
            }
        }
    }

    fn on_request(&mut self, now_ns: i64) {
        if let Some(byte) = self.queue.pop() {
            self.channel.reply(byte);
            self.bytes_delivered = self.bytes_delivered.wrapping_add(1);
            rt_trace!(self.log, now_ns, "reply 0x{:02X}", byte);
        }
    }
}
