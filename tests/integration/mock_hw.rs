//! Mock adapters for integration tests.
//!
//! Record every port call so tests can assert on the full command
//! history without touching real GPIO/PWM registers or a cloud link.

use std::cell::Cell;

use aquasense::app::ports::{
    ActuatorPort, ClockPort, DisplayError, DisplayPort, ParamValue, ReportError, ReporterPort,
};
use aquasense::error::ActuatorError;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    Servo(i32),
    Gpio { pin: i32, state: bool },
}

// ── MockActuators ─────────────────────────────────────────────

#[derive(Default)]
pub struct MockActuators {
    pub calls: Vec<ActuatorCall>,
    /// When set, every GPIO write fails (calls are still recorded).
    pub fail_gpio: bool,
}

#[allow(dead_code)]
impl MockActuators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gpio_level(&self, pin: i32) -> Option<bool> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::Gpio { pin: p, state } if *p == pin => Some(*state),
            _ => None,
        })
    }

    pub fn servo(&self) -> Option<i32> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::Servo(a) => Some(*a),
            _ => None,
        })
    }
}

impl ActuatorPort for MockActuators {
    fn set_servo_angle(&mut self, angle: i32) -> Result<(), ActuatorError> {
        self.calls.push(ActuatorCall::Servo(angle));
        Ok(())
    }

    fn set_gpio(&mut self, pin: i32, state: bool) -> Result<(), ActuatorError> {
        self.calls.push(ActuatorCall::Gpio { pin, state });
        if self.fail_gpio {
            return Err(ActuatorError::GpioWriteFailed(-1));
        }
        Ok(())
    }
}

// ── MockReporter ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockReporter {
    pub reports: Vec<(String, String, ParamValue)>,
    pub alerts: Vec<String>,
    /// When set, `report_metric` fails and records nothing.
    pub offline: bool,
}

#[allow(dead_code)]
impl MockReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports_for(&self, device: &str) -> Vec<ParamValue> {
        self.reports
            .iter()
            .filter(|(d, _, _)| d == device)
            .map(|(_, _, v)| *v)
            .collect()
    }
}

impl ReporterPort for MockReporter {
    fn report_metric(&mut self, device: &str, param: &str, value: ParamValue) -> Result<(), ReportError> {
        if self.offline {
            return Err(ReportError::NotConnected);
        }
        self.reports.push((device.into(), param.into(), value));
        Ok(())
    }

    fn raise_alert(&mut self, message: &str) -> Result<(), ReportError> {
        self.alerts.push(message.into());
        Ok(())
    }
}

// ── MockDisplay ───────────────────────────────────────────────

#[derive(Default)]
pub struct MockDisplay {
    pub clears: usize,
    pub lines: Vec<(u8, String)>,
    pub fail: bool,
}

#[allow(dead_code)]
impl MockDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisplayPort for MockDisplay {
    fn clear(&mut self) -> Result<(), DisplayError> {
        if self.fail {
            return Err(DisplayError::BusError);
        }
        self.clears += 1;
        self.lines.clear();
        Ok(())
    }

    fn render_line(&mut self, row: u8, text: &str) -> Result<(), DisplayError> {
        if self.fail {
            return Err(DisplayError::BusError);
        }
        self.lines.push((row, text.into()));
        Ok(())
    }
}

// ── ManualClock ───────────────────────────────────────────────

#[derive(Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn at(ms: u64) -> Self {
        Self { now: Cell::new(ms) }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl ClockPort for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}
