//! Analog turbidity sensor.
//!
//! The probe outputs a voltage that falls as the water gets cloudier.
//! A single conversion is too noisy to use directly, so each reading
//! averages a window of raw samples before applying the manufacturer's
//! quadratic calibration curve.
//!
//! The averaging loop runs synchronously: with the default 800-sample
//! window it is the dominant cost of an acquisition cycle and blocks
//! only the acquisition task.

use log::warn;

use super::raw_to_voltage;
use crate::app::model::TURBIDITY_MAX_NTU;
use crate::app::ports::AdcPort;
use crate::error::SensorError;

/// Below this voltage the probe is saturated (opaque water).
pub const SATURATION_VOLTAGE: f32 = 0.36;
/// Above this voltage the water reads as clear.
pub const CLEAR_VOLTAGE: f32 = 1.8;

// NTU = A·x² + B·x + C with x = v + X_OFFSET
const A: f32 = -1120.4;
const B: f32 = 5742.3;
const C: f32 = -4352.9;
const X_OFFSET: f32 = 2.4;

#[derive(Debug, Clone, Copy)]
pub struct TurbidityReading {
    /// Mean probe voltage over the window.
    pub voltage: f32,
    pub ntu: f32,
    /// Samples that converted successfully.
    pub valid_samples: u16,
}

pub struct TurbiditySensor {
    channel: u32,
    window: u16,
}

impl TurbiditySensor {
    pub fn new(channel: u32, window: u16) -> Self {
        Self {
            channel,
            window: window.max(1),
        }
    }

    /// Average one window of samples and convert to NTU.
    ///
    /// Failed conversions are skipped; the read only fails when the whole
    /// window failed.
    pub fn read(&self, adc: &mut impl AdcPort) -> Result<TurbidityReading, SensorError> {
        let mut sum = 0.0_f32;
        let mut valid: u16 = 0;
        for _ in 0..self.window {
            if let Ok(raw) = adc.read_raw(self.channel) {
                sum += raw_to_voltage(raw);
                valid += 1;
            }
        }
        if valid == 0 {
            return Err(SensorError::NoValidSamples);
        }
        if valid < self.window {
            warn!(
                "Turbidity: {}/{} samples failed",
                self.window - valid,
                self.window
            );
        }
        let voltage = sum / f32::from(valid);
        Ok(TurbidityReading {
            voltage,
            ntu: ntu_from_voltage(voltage),
            valid_samples: valid,
        })
    }
}

/// Piecewise voltage → NTU conversion.
///
/// Outside the fitted range the curve is not trusted: saturated readings
/// pin to 3000 NTU and clear-water readings to 0.
pub fn ntu_from_voltage(voltage: f32) -> f32 {
    if voltage < SATURATION_VOLTAGE {
        TURBIDITY_MAX_NTU
    } else if voltage > CLEAR_VOLTAGE {
        0.0
    } else {
        calibration_curve(voltage).clamp(0.0, TURBIDITY_MAX_NTU)
    }
}

/// The raw calibration polynomial, unbounded.
pub fn calibration_curve(voltage: f32) -> f32 {
    let x = voltage + X_OFFSET;
    A * x * x + B * x + C
}

/// Voltage at which the calibration polynomial peaks.
pub fn curve_vertex_voltage() -> f32 {
    -B / (2.0 * A) - X_OFFSET
}
