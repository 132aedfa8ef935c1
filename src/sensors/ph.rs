//! Analog pH probe (amplifier board with linear voltage output).
//!
//! One raw conversion per reading; the probe board already low-pass
//! filters its output, so no averaging is applied.

use super::raw_to_voltage;
use crate::app::ports::AdcPort;
use crate::error::SensorError;

// pH = OFFSET + SLOPE·v (two-point calibration of the amplifier board)
const OFFSET: f32 = 20.5940;
const SLOPE: f32 = -5.4450;

#[derive(Debug, Clone, Copy)]
pub struct PhReading {
    pub raw: u16,
    pub voltage: f32,
    pub ph: f32,
}

pub struct PhSensor {
    channel: u32,
}

impl PhSensor {
    pub fn new(channel: u32) -> Self {
        Self { channel }
    }

    pub fn read(&self, adc: &mut impl AdcPort) -> Result<PhReading, SensorError> {
        let raw = adc.read_raw(self.channel)?;
        let voltage = raw_to_voltage(raw);
        Ok(PhReading {
            raw,
            voltage,
            ph: ph_from_voltage(voltage),
        })
    }
}

pub fn ph_from_voltage(voltage: f32) -> f32 {
    OFFSET + SLOPE * voltage
}
