//! Hardware-facing error types for the AquaSense firmware.
//!
//! All variants are `Copy` so they can be logged and passed through the
//! stage logic without allocation.  None of them is fatal once the tasks
//! are running: a failed sensor read keeps the previous value, a failed
//! actuator write is logged and retried on the next transition.

use core::fmt;

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// ADC read returned an error or timed out.
    AdcReadFailed,
    /// Every sample of an averaging window failed.
    NoValidSamples,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcReadFailed => write!(f, "ADC read failed"),
            Self::NoValidSamples => write!(f, "no valid samples in window"),
        }
    }
}

impl std::error::Error for SensorError {}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// PWM duty-cycle write failed (carries the driver return code).
    PwmWriteFailed(i32),
    /// GPIO set failed (carries the driver return code).
    GpioWriteFailed(i32),
    /// The pin is not one of the configured outputs.
    UnknownPin(i32),
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmWriteFailed(rc) => write!(f, "PWM write failed (rc={rc})"),
            Self::GpioWriteFailed(rc) => write!(f, "GPIO write failed (rc={rc})"),
            Self::UnknownPin(pin) => write!(f, "GPIO {pin} is not a configured output"),
        }
    }
}

impl std::error::Error for ActuatorError {}
