//! Sensor subsystem: individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns every sensor driver plus the ADC adapter and produces one
//! [`Reading`] per acquisition cycle.

pub mod ph;
pub mod temperature;
pub mod turbidity;

use log::warn;

use crate::app::model::{ActuatorStatus, Reading};
use crate::app::ports::AdcPort;
use crate::config::MonitorConfig;
use crate::pins;
use ph::PhSensor;
use temperature::TemperatureSource;
use turbidity::TurbiditySensor;

/// Convert a 12-bit raw ADC sample to volts.
pub fn raw_to_voltage(raw: u16) -> f32 {
    f32::from(raw) * (pins::ADC_VREF / pins::ADC_MAX_RAW)
}

/// Aggregates all sensor drivers and produces a unified reading.
pub struct SensorHub<'s, A: AdcPort, T: TemperatureSource> {
    adc: A,
    temperature: T,
    ph: PhSensor,
    turbidity: TurbiditySensor,
    actuators: &'s ActuatorStatus,
    last: Reading,
}

impl<'s, A: AdcPort, T: TemperatureSource> SensorHub<'s, A, T> {
    pub fn new(adc: A, temperature: T, config: &MonitorConfig, actuators: &'s ActuatorStatus) -> Self {
        Self {
            adc,
            temperature,
            ph: PhSensor::new(pins::PH_ADC_CHANNEL),
            turbidity: TurbiditySensor::new(pins::TURBIDITY_ADC_CHANNEL, config.turbidity_samples),
            actuators,
            last: Reading {
                temp_c: config.default_temperature_c,
                ph: 7.0,
                turbidity_ntu: 0.0,
                drain_on: false,
                servo_angle: 0,
            },
        }
    }

    /// Read every sensor and return a unified reading.
    ///
    /// Individual read failures are logged and the previous good value is
    /// retained.
    pub fn acquire(&mut self) -> Reading {
        let mut next = self.last;

        match self.temperature.read_celsius() {
            Ok(c) => next.temp_c = c,
            Err(e) => warn!("Temperature read failed ({}), keeping {:.2}", e, next.temp_c),
        }
        match self.ph.read(&mut self.adc) {
            Ok(r) => next.ph = r.ph,
            Err(e) => warn!("pH read failed ({}), keeping {:.2}", e, next.ph),
        }
        match self.turbidity.read(&mut self.adc) {
            Ok(r) => next.turbidity_ntu = r.ntu,
            Err(e) => warn!("Turbidity read failed ({}), keeping {:.2}", e, next.turbidity_ntu),
        }

        next.drain_on = self.actuators.drain_on();
        next.servo_angle = self.actuators.servo_angle();

        self.last = next.sanitized(&self.last);
        self.last
    }
}
