//! GPIO HAL for the RX input line.

#[cfg(target_os = "espidf")]
use crate::line::Level;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::gpio::{AnyIOPin, Input, PinDriver, Pull};
#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::EspError;

/// RX pin configuration.
#[derive(Clone, Copy, Debug)]
pub struct RxPinConfig {
    pub pin: i32,
    /// Enable the internal pull-up so a disconnected line reads idle.
    pub pull_up: bool,
}

impl Default for RxPinConfig {
    fn default() -> Self {
        Self {
            pin: 4,
            pull_up: true,
        }
    }
}

/// RX input pin.
#[cfg(target_os = "espidf")]
pub struct RxPin<'d> {
    driver: PinDriver<'d, AnyIOPin, Input>,
}

#[cfg(target_os = "espidf")]
impl<'d> RxPin<'d> {
    pub fn new(pin: AnyIOPin, config: &RxPinConfig) -> Result<Self, EspError> {
        let mut driver = PinDriver::input(pin)?;
        driver.set_pull(if config.pull_up { Pull::Up } else { Pull::Floating })?;
        Ok(Self { driver })
    }

    /// Current line level.
    #[inline]
    pub fn level(&self) -> Level {
        Level::from_bool(self.driver.is_high())
    }
}
