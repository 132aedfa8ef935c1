//! Water temperature source.
//!
//! The current board has no temperature probe fitted, so the shipped
//! implementation is [`FixedTemperature`], which reports the configured
//! default.  A real probe driver implements [`TemperatureSource`] and is
//! handed to the [`SensorHub`](super::SensorHub) instead.

use crate::error::SensorError;

/// Anything that yields a water temperature in °C.
pub trait TemperatureSource {
    fn read_celsius(&mut self) -> Result<f32, SensorError>;
}

/// Placeholder source returning a constant.
pub struct FixedTemperature {
    celsius: f32,
}

impl FixedTemperature {
    pub fn new(celsius: f32) -> Self {
        Self { celsius }
    }
}

impl TemperatureSource for FixedTemperature {
    fn read_celsius(&mut self) -> Result<f32, SensorError> {
        Ok(self.celsius)
    }
}
