//! Port traits: the hexagonal boundary between the pipeline and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Stage (domain)
//! ```
//!
//! Driven adapters (ADC, actuators, display, device-management bridge)
//! implement these traits.  The stages consume them via generics, so the
//! filtering, gating and latch logic never touches hardware directly.

use crate::error::{ActuatorError, SensorError};

// ───────────────────────────────────────────────────────────────
// ADC port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Raw analog sampling, one conversion per call.
pub trait AdcPort {
    /// Read one 12-bit raw sample from an ADC1 channel.
    fn read_raw(&mut self, channel: u32) -> Result<u16, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the control stage commands actuators through this.
pub trait ActuatorPort {
    /// Move the outlet servo.  `1` = open, `0` = closed; other values are a
    /// pulse width in milliseconds, bounded to the configured range.
    fn set_servo_angle(&mut self, angle: i32) -> Result<(), ActuatorError>;

    /// Drive a binary output (drain valve, alarm indicator).
    fn set_gpio(&mut self, pin: i32, state: bool) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Reporter port (driven adapter: domain → device-management layer)
// ───────────────────────────────────────────────────────────────

/// Value of a remote device parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Int(i32),
    Float(f32),
}

impl core::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v:.2}"),
        }
    }
}

/// Upstream reporting to the remote device-management layer.
///
/// Failures are reported back but never retried here: the control stage
/// leaves its gate untouched so the next qualifying cycle reports again.
pub trait ReporterPort {
    /// Update and report one device parameter.
    fn report_metric(
        &mut self,
        device: &str,
        param: &str,
        value: ParamValue,
    ) -> Result<(), ReportError>;

    /// Push a user-facing alert notification.
    fn raise_alert(&mut self, message: &str) -> Result<(), ReportError>;
}

// ───────────────────────────────────────────────────────────────
// Remote write capability (driving adapter: remote → domain)
// ───────────────────────────────────────────────────────────────

/// Invoked by the device-management layer when a remote client writes a
/// parameter.
pub trait WriteRequestHandler {
    fn on_write(&mut self, device: &str, param: &str, value: ParamValue) -> Result<(), WriteError>;
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → screen)
// ───────────────────────────────────────────────────────────────

/// Line-oriented text display.
pub trait DisplayPort {
    /// Blank the whole screen.
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Render `text` on text row `row` (0-based).
    fn render_line(&mut self, row: u8, text: &str) -> Result<(), DisplayError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic milliseconds since boot.
pub trait ClockPort {
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ReporterPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportError {
    /// The device-management layer is not connected.
    NotConnected,
    /// The named device or parameter was never registered.
    UnknownParam,
    /// The layer rejected or failed to send the update.
    SendFailed,
}

/// Errors from [`WriteRequestHandler`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteError {
    /// The value type does not match the parameter.
    InvalidValue,
    /// The command queue is full; the write was not accepted.
    Busy,
}

/// Errors from [`DisplayPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// Bus transaction to the panel failed.
    BusError,
    /// Row index beyond the panel.
    RowOutOfRange(u8),
}

impl core::fmt::Display for ReportError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotConnected => write!(f, "not connected"),
            Self::UnknownParam => write!(f, "unknown device parameter"),
            Self::SendFailed => write!(f, "send failed"),
        }
    }
}

impl core::fmt::Display for WriteError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidValue => write!(f, "invalid value type"),
            Self::Busy => write!(f, "command queue busy"),
        }
    }
}

impl core::fmt::Display for DisplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BusError => write!(f, "display bus error"),
            Self::RowOutOfRange(row) => write!(f, "row {} out of range", row),
        }
    }
}

impl std::error::Error for ReportError {}
impl std::error::Error for WriteError {}
impl std::error::Error for DisplayError {}
