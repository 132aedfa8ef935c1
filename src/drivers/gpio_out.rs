//! Binary GPIO output (drain valve relay, alarm indicator).

use log::info;

use crate::drivers::hw_init;
use crate::error::ActuatorError;

pub struct GpioOutput {
    pin: i32,
    label: &'static str,
    on: bool,
}

impl GpioOutput {
    /// The pin must already be configured as an output by `hw_init`.
    pub fn new(pin: i32, label: &'static str) -> Self {
        Self { pin, label, on: false }
    }

    pub fn set(&mut self, on: bool) -> Result<(), ActuatorError> {
        hw_init::gpio_write(self.pin, on).map_err(ActuatorError::GpioWriteFailed)?;
        self.on = on;
        info!("{} set to {}", self.label, if on { "ON" } else { "OFF" });
        Ok(())
    }

    pub fn pin(&self) -> i32 {
        self.pin
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}
