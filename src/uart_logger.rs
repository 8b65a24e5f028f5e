//! Log output over a TX-only hardware UART.
//!
//! The receiver itself is software-sampled; diagnostics go out on a real
//! UART peripheral so logging never competes with the sampling loop.
//!
//! ```text
//! ESP32-S3 GPIO43 (U0TXD) ──────▶ USB-UART RX
//!                                  └─▶ PC Serial Monitor
//! ```

use core::fmt::Write;

use crate::logging::{BufWriter, LogEntry};

#[cfg(target_os = "espidf")]
use crate::log_globals::{BG_LOG_STREAM, RX_LOG_STREAM};
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::gpio;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::peripheral::Peripheral;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::uart::{self, UartTxDriver};

/// Interval between dropped-message reports.
pub const DROPPED_REPORT_INTERVAL_US: i64 = 10_000_000;

/// UART configuration for logging.
///
/// The TX pin is handed to `init_uart_logger` as a peripheral.
pub struct UartLoggerConfig {
    pub baud_rate: u32,
}

impl Default for UartLoggerConfig {
    fn default() -> Self {
        Self { baud_rate: 115200 }
    }
}

/// Format log entry to string.
///
/// Format: `[timestamp_us] LEVEL: message\n`
pub fn format_log_entry(entry: &LogEntry, buf: &mut [u8]) -> usize {
    let mut writer = BufWriter::new(buf);

    let _ = writeln!(
        writer,
        "[{:10}] {}: {}",
        entry.timestamp_ns / 1_000,
        entry.level.as_str(),
        entry.text()
    );

    writer.len()
}

/// Format the periodic dropped-message report.
pub fn format_dropped_report(rx_dropped: u32, bg_dropped: u32, buf: &mut [u8]) -> usize {
    let mut writer = BufWriter::new(buf);
    let _ = writeln!(writer, "[WARN] Dropped: RX={}, BG={}", rx_dropped, bg_dropped);
    writer.len()
}

/// Initialize UART1 TX-only for logging output.
#[cfg(target_os = "espidf")]
pub fn init_uart_logger<'d>(
    uart: impl Peripheral<P = uart::UART1> + 'd,
    tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
    config: &UartLoggerConfig,
) -> Result<UartTxDriver<'d>, esp_idf_svc::sys::EspError> {
    let uart_config = uart::config::Config::default()
        .baudrate(esp_idf_svc::hal::units::Hertz(config.baud_rate));

    UartTxDriver::new(
        uart,
        tx_pin,
        Option::<gpio::AnyIOPin>::None, // CTS
        Option::<gpio::AnyIOPin>::None, // RTS
        &uart_config,
    )
}

/// UART log task.
///
/// Drains RX_LOG_STREAM and BG_LOG_STREAM, writes to UART.
#[cfg(target_os = "espidf")]
pub fn uart_logger_task(uart: &mut UartTxDriver<'_>) -> ! {
    let mut format_buf = [0u8; 160];
    let mut last_dropped_report = 0i64;

    loop {
        let mut work_done = false;

        // Receiver stream first
        while let Some(entry) = RX_LOG_STREAM.drain() {
            let len = format_log_entry(&entry, &mut format_buf);
            let _ = uart.write(&format_buf[..len]);
            work_done = true;
        }

        while let Some(entry) = BG_LOG_STREAM.drain() {
            let len = format_log_entry(&entry, &mut format_buf);
            let _ = uart.write(&format_buf[..len]);
            work_done = true;
        }

        // SAFETY: esp_timer_get_time has no preconditions
        let now = unsafe { esp_idf_svc::sys::esp_timer_get_time() };
        if now - last_dropped_report > DROPPED_REPORT_INTERVAL_US {
            let rx_dropped = RX_LOG_STREAM.dropped();
            let bg_dropped = BG_LOG_STREAM.dropped();

            if rx_dropped > 0 || bg_dropped > 0 {
                let len = format_dropped_report(rx_dropped, bg_dropped, &mut format_buf);
                let _ = uart.write(&format_buf[..len]);

                RX_LOG_STREAM.reset_dropped();
                BG_LOG_STREAM.reset_dropped();
            }

            last_dropped_report = now;
        }

        if !work_done {
            // SAFETY: plain FreeRTOS delay from task context
            unsafe {
                esp_idf_svc::sys::vTaskDelay(10);
            }
        }
    }
}
