//! Inbound commands to the control stage.
//!
//! Remote parameter writes are not applied on the caller's thread: the
//! [`RemoteWriteHandler`] turns them into [`ControlCommand`]s and queues
//! them for the control task, which is the only owner of the actuators.

use log::{info, warn};

use super::ports::{ParamValue, WriteError, WriteRequestHandler};
use crate::telemetry::CommandQueue;

/// Remote device exposing the outlet servo.
pub const SERVO_DEVICE: &str = "Servo";
/// Remote device exposing the drain valve.
pub const DRAIN_DEVICE: &str = "Water Drain";
/// Switch parameter shared by the servo and drain devices.
pub const POWER_PARAM: &str = "Power";

/// Commands that external adapters can send into the control stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Move the outlet servo (`1` = open, `0` = closed).
    SetServo(i32),
}

/// [`WriteRequestHandler`] that forwards servo switch writes to the
/// control task.
pub struct RemoteWriteHandler<'q> {
    commands: &'q CommandQueue,
}

impl<'q> RemoteWriteHandler<'q> {
    pub fn new(commands: &'q CommandQueue) -> Self {
        Self { commands }
    }
}

impl WriteRequestHandler for RemoteWriteHandler<'_> {
    fn on_write(&mut self, device: &str, param: &str, value: ParamValue) -> Result<(), WriteError> {
        if param != POWER_PARAM {
            // Unknown params are ignored, not rejected.
            return Ok(());
        }
        info!("Remote write: {} - {} = {}", device, param, value);
        if device != SERVO_DEVICE {
            return Ok(());
        }

        let angle = match value {
            ParamValue::Bool(on) => i32::from(on),
            ParamValue::Int(v) => v,
            ParamValue::Float(_) => return Err(WriteError::InvalidValue),
        };

        if self.commands.try_send(ControlCommand::SetServo(angle)).is_err() {
            warn!("Remote write: command queue full, dropping servo={}", angle);
            return Err(WriteError::Busy);
        }
        Ok(())
    }
}
