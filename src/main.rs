//! SoftUartRx - Main entry point
//!
//! On ESP32:
//! 1. Bring up the log UART
//! 2. Start the receiver loop on Core 0 (owns the core, never sleeps)
//! 3. Start the byte consumer on Core 1
//! 4. Drain logs from the main task
//!
//! On a host target the binary runs a loopback self-test through the
//! simulated line instead.

#![cfg_attr(target_os = "espidf", no_std, no_main)]

/// Version string (set by build.rs, includes git hash)
pub const VERSION: &str = env!("VERSION_STRING");

#[cfg(target_os = "espidf")]
mod firmware {
    use core::ffi::c_void;

    use esp_idf_svc::hal::gpio::AnyIOPin;
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::sys as esp_idf_sys;

    use soft_uart_rx::{
        fault::FaultState,
        handoff::ByteChannel,
        hal::{RxPin, RxPinConfig},
        log_globals::{BG_LOG_STREAM, RX_LOG_STREAM},
        uart_logger::{init_uart_logger, uart_logger_task, UartLoggerConfig},
        Dispatcher, RxConfig,
    };
    use soft_uart_rx::{rt_error, rt_info, rt_warn};

    const RX_CONFIG: RxConfig = RxConfig::DEFAULT;

    const RX_TASK_PRIORITY: u32 = 24;
    const CONSUMER_TASK_PRIORITY: u32 = 5;
    const TASK_STACK_SIZE: u32 = 4096;

    static CHANNEL: ByteChannel = ByteChannel::new();
    static FAULT_STATE: FaultState = FaultState::new();

    #[inline]
    fn now_ns() -> i64 {
        // SAFETY: esp_timer_get_time has no preconditions
        unsafe { esp_idf_sys::esp_timer_get_time() * 1_000 }
    }

    #[inline]
    fn delay_ticks(ticks: u32) {
        // SAFETY: plain FreeRTOS delay from task context
        unsafe { esp_idf_sys::vTaskDelay(ticks) }
    }

    fn park() -> ! {
        loop {
            delay_ticks(1000);
        }
    }

    pub fn main() {
        esp_idf_sys::link_patches();

        rt_info!(BG_LOG_STREAM, now_ns(), "{}", super::VERSION);

        let peripherals = match Peripherals::take() {
            Ok(p) => p,
            Err(e) => {
                rt_error!(BG_LOG_STREAM, now_ns(), "peripherals: {}", e);
                park();
            }
        };

        let mut log_uart = match init_uart_logger(
            peripherals.uart1,
            peripherals.pins.gpio43,
            &UartLoggerConfig::default(),
        ) {
            Ok(uart) => uart,
            Err(_) => park(),
        };

        // SAFETY: task entry points take no argument and never return
        unsafe {
            esp_idf_sys::xTaskCreatePinnedToCore(
                Some(rx_task),
                c"uart_rx".as_ptr(),
                TASK_STACK_SIZE,
                core::ptr::null_mut(),
                RX_TASK_PRIORITY,
                core::ptr::null_mut(),
                0,
            );
            esp_idf_sys::xTaskCreatePinnedToCore(
                Some(consumer_task),
                c"rx_consumer".as_ptr(),
                TASK_STACK_SIZE,
                core::ptr::null_mut(),
                CONSUMER_TASK_PRIORITY,
                core::ptr::null_mut(),
                1,
            );
        }

        uart_logger_task(&mut log_uart);
    }

    /// Receiver loop (Core 0, highest priority).
    ///
    /// Busy-polls: edge latency is bounded by one loop iteration, so this
    /// task never yields. Requires CONFIG_ESP_TASK_WDT_CHECK_IDLE_TASK_CPU0=n.
    unsafe extern "C" fn rx_task(_arg: *mut c_void) {
        let pin_config = RxPinConfig::default();

        // SAFETY: the RX pin number is reserved for this task and not
        // taken through `Peripherals` anywhere else.
        let pin = match RxPin::new(AnyIOPin::new(pin_config.pin), &pin_config) {
            Ok(pin) => pin,
            Err(e) => {
                rt_error!(RX_LOG_STREAM, now_ns(), "rx pin {}: {}", pin_config.pin, e);
                park();
            }
        };

        let mut rx: Dispatcher = Dispatcher::new(RX_CONFIG, &CHANNEL, &FAULT_STATE, &RX_LOG_STREAM);
        rt_info!(
            RX_LOG_STREAM,
            now_ns(),
            "rx on gpio{} @ {} baud",
            pin_config.pin,
            RX_CONFIG.baud()
        );

        loop {
            rx.step(now_ns(), pin.level());

            // Mid-byte with nobody waiting: nothing can become eligible
            // before the deadline, so skip the pin reads.
            if let Some(deadline) = rx.next_wakeup() {
                while !CHANNEL.is_pending() && now_ns() < deadline {
                    core::hint::spin_loop();
                }
            }
        }
    }

    /// Byte consumer (Core 1).
    unsafe extern "C" fn consumer_task(_arg: *mut c_void) {
        loop {
            let byte = CHANNEL.recv_with(|| delay_ticks(1));
            rt_info!(BG_LOG_STREAM, now_ns(), "byte 0x{:02X}", byte);

            if FAULT_STATE.is_active() {
                let snap = FAULT_STATE.snapshot();
                rt_warn!(
                    BG_LOG_STREAM,
                    now_ns(),
                    "faults: {} overrun, {} late",
                    snap.overruns,
                    snap.late_samples
                );
                FAULT_STATE.clear();
            }
        }
    }
}

#[cfg(target_os = "espidf")]
#[no_mangle]
fn main() {
    firmware::main();
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    use soft_uart_rx::logging::LogLevel;
    use soft_uart_rx::sim::SimLine;
    use soft_uart_rx::uart_logger::format_log_entry;
    use soft_uart_rx::{ByteChannel, Dispatcher, FaultState, RxConfig, RX_LOG_STREAM};

    println!("{} (host loopback)", VERSION);

    let config = RxConfig::DEFAULT;
    let period = config.bit_period_ns();
    let message = b"hello, uart";

    // One idle bit period before each frame and two after
    let frames: Vec<(i64, u8)> = message
        .iter()
        .enumerate()
        .map(|(i, &b)| (period * (1 + 12 * i as i64), b))
        .collect();
    let line = SimLine::new(config, &frames);

    let channel = ByteChannel::new();
    let fault = FaultState::new();
    RX_LOG_STREAM.set_level(LogLevel::Debug);
    let mut rx: Dispatcher = Dispatcher::new(config, &channel, &fault, &RX_LOG_STREAM);

    let step = period / 16;
    let mut received = Vec::with_capacity(message.len());
    let mut log_buf = [0u8; 160];

    channel.request();
    let mut t = 0;
    while t < line.end_ns() + 2 * period {
        rx.step(t, line.level_at(t));

        if let Some(byte) = channel.try_recv() {
            received.push(byte);
            channel.request();
        }
        while let Some(entry) = RX_LOG_STREAM.drain() {
            let len = format_log_entry(&entry, &mut log_buf);
            print!("{}", String::from_utf8_lossy(&log_buf[..len]));
        }

        t += step;
    }

    println!("received: {:?}", String::from_utf8_lossy(&received));
    println!("stats: {:?}", rx.stats());

    if received != message {
        eprintln!("loopback mismatch");
        std::process::exit(1);
    }
}
