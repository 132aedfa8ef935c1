//! Outlet servo driver (hobby servo on LEDC channel 0).
//!
//! The servo takes a 50 Hz frame whose high time sets the horn position.
//! Callers speak in "angles" the way the remote parameter does:
//!
//! | angle       | pulse                                  |
//! |-------------|----------------------------------------|
//! | `1`         | open: midpoint of the configured range |
//! | `0`         | closed: longest configured pulse       |
//! | anything else | pulse in ms, clamped to the range    |
//!
//! On host builds the duty write lands in the `hw_init` simulation.

use log::info;

use crate::config::MonitorConfig;
use crate::drivers::hw_init;
use crate::error::ActuatorError;
use crate::pins;

/// Servo frame period (20 ms at 50 Hz).
const FRAME_MS: f32 = 1000.0 / pins::SERVO_PWM_FREQ_HZ as f32;
/// Duty counts per percent of the frame (81.91 at 13 bits).
const DUTY_PER_PERCENT: f32 = ((1u32 << pins::SERVO_PWM_RESOLUTION_BITS) - 1) as f32 / 100.0;

pub struct ServoDriver {
    channel: u32,
    min_ms: f32,
    max_ms: f32,
    open_ms: f32,
    angle: i32,
    duty: u32,
}

impl ServoDriver {
    pub fn new(channel: u32, config: &MonitorConfig) -> Self {
        Self {
            channel,
            min_ms: config.servo_pulse_min_ms,
            max_ms: config.servo_pulse_max_ms,
            open_ms: config.servo_open_ms(),
            angle: 0,
            duty: 0,
        }
    }

    /// Pulse width (ms) commanded by `angle`.
    pub fn pulse_for_angle(&self, angle: i32) -> f32 {
        match angle {
            1 => self.open_ms,
            0 => self.max_ms,
            other => (other as f32).clamp(self.min_ms, self.max_ms),
        }
    }

    /// 13-bit LEDC duty for a pulse width.
    pub fn duty_for_pulse(pulse_ms: f32) -> u32 {
        (100.0 * (pulse_ms / FRAME_MS) * DUTY_PER_PERCENT) as u32
    }

    pub fn set_angle(&mut self, angle: i32) -> Result<(), ActuatorError> {
        let pulse = self.pulse_for_angle(angle);
        let duty = Self::duty_for_pulse(pulse);
        hw_init::ledc_set_duty(self.channel, duty).map_err(ActuatorError::PwmWriteFailed)?;
        self.angle = angle;
        self.duty = duty;
        info!("Servo angle set to {} (pulse {:.2} ms, duty {})", angle, pulse, duty);
        Ok(())
    }

    /// Last successfully applied angle.
    pub fn angle(&self) -> i32 {
        self.angle
    }

    pub fn duty(&self) -> u32 {
        self.duty
    }
}
