//! Hardware adapter: bridges the actuator drivers to [`ActuatorPort`].
//!
//! Owned by the control task.  Every successful write is mirrored into
//! the shared [`ActuatorStatus`] so the acquisition task can stamp the
//! current drain/servo state onto each reading.

use log::info;

use crate::app::model::ActuatorStatus;
use crate::app::ports::ActuatorPort;
use crate::config::MonitorConfig;
use crate::drivers::gpio_out::GpioOutput;
use crate::drivers::servo::ServoDriver;
use crate::error::ActuatorError;
use crate::pins;

/// Concrete adapter that combines all actuators behind the port trait.
pub struct HardwareAdapter<'s> {
    servo: ServoDriver,
    drain: GpioOutput,
    indicator: GpioOutput,
    status: &'s ActuatorStatus,
}

impl<'s> HardwareAdapter<'s> {
    pub fn new(config: &MonitorConfig, status: &'s ActuatorStatus) -> Self {
        Self {
            servo: ServoDriver::new(pins::SERVO_LEDC_CHANNEL, config),
            drain: GpioOutput::new(pins::DRAIN_GPIO, "Drain"),
            indicator: GpioOutput::new(pins::INDICATOR_GPIO, "Indicator"),
            status,
        }
    }

    /// Drive every output to its safe idle state: drain and indicator
    /// off, servo closed.
    pub fn init_outputs(&mut self) -> Result<(), ActuatorError> {
        self.set_gpio(pins::DRAIN_GPIO, false)?;
        self.set_gpio(pins::INDICATOR_GPIO, false)?;
        self.set_servo_angle(0)?;
        info!("Actuators initialised (drain off, servo closed)");
        Ok(())
    }

    pub fn servo(&self) -> &ServoDriver {
        &self.servo
    }

    pub fn drain_on(&self) -> bool {
        self.drain.is_on()
    }

    pub fn indicator_on(&self) -> bool {
        self.indicator.is_on()
    }
}

impl ActuatorPort for HardwareAdapter<'_> {
    fn set_servo_angle(&mut self, angle: i32) -> Result<(), ActuatorError> {
        self.servo.set_angle(angle)?;
        self.status.record_servo(angle);
        Ok(())
    }

    fn set_gpio(&mut self, pin: i32, state: bool) -> Result<(), ActuatorError> {
        if pin == self.drain.pin() {
            self.drain.set(state)?;
            self.status.record_drain(state);
            Ok(())
        } else if pin == self.indicator.pin() {
            self.indicator.set(state)
        } else {
            Err(ActuatorError::UnknownPin(pin))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::hw_init::sim;

    #[test]
    fn writes_mirror_into_status() {
        let status = ActuatorStatus::new();
        let mut hw = HardwareAdapter::new(&MonitorConfig::default(), &status);
        hw.init_outputs().unwrap();
        assert!(!status.drain_on());

        hw.set_gpio(pins::DRAIN_GPIO, true).unwrap();
        hw.set_servo_angle(1).unwrap();
        assert!(status.drain_on());
        assert_eq!(status.servo_angle(), 1);
        assert!(sim::gpio_level(pins::DRAIN_GPIO));
        assert_eq!(sim::ledc_duty(pins::SERVO_LEDC_CHANNEL), 442);

        hw.set_gpio(pins::INDICATOR_GPIO, true).unwrap();
        assert!(hw.indicator_on());
    }

    #[test]
    fn unknown_pin_rejected() {
        let status = ActuatorStatus::new();
        let mut hw = HardwareAdapter::new(&MonitorConfig::default(), &status);
        assert_eq!(hw.set_gpio(2, true), Err(ActuatorError::UnknownPin(2)));
    }
}
