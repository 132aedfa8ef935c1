//! Device control stage.
//!
//! Consumes readings from the control queue and does two things with each:
//!
//! 1. **Change-gated reporting.**  A metric is pushed upstream only when it
//!    moved by at least its threshold since the last *successful* report
//!    and the per-metric rate limit has elapsed.
//! 2. **pH hysteresis latch.**  Crossing the alert limit opens the drain,
//!    lights the indicator and opens the outlet servo; dropping back below
//!    it reverses all three.  Transitions are spaced by a cooldown.
//!
//! ```text
//!            ph > limit && cooldown elapsed
//!   Normal ─────────────────────────────────▶ Alerting
//!      ▲                                         │
//!      └─────────────────────────────────────────┘
//!            ph < limit && cooldown elapsed
//! ```
//!
//! All I/O goes through [`ActuatorPort`] and [`ReporterPort`], so the stage
//! runs unchanged against the mocks in `tests/integration`.

use core::fmt::Write;

use heapless::String;
use log::{info, warn};

use super::commands::{ControlCommand, DRAIN_DEVICE, POWER_PARAM, SERVO_DEVICE};
use super::model::{Metric, Reading, changed};
use super::ports::{ActuatorPort, ParamValue, ReporterPort};
use crate::config::{ChangeThresholds, MonitorConfig};
use crate::pins;

/// Servo command for the open outlet.
pub const SERVO_OPEN: i32 = 1;
/// Servo command for the closed outlet.
pub const SERVO_CLOSED: i32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertState {
    Normal,
    Alerting,
}

/// Mutable state of the control stage.  Owned by the control task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlState {
    /// Last successfully reported value per metric.
    pub last: Reading,
    /// Time of the last successful report per metric (`None` = never).
    pub last_report_ms: [Option<u64>; 3],
    pub alert: AlertState,
    /// Time of the last latch transition (`None` = never).
    pub last_alert_ms: Option<u64>,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            last: Reading::ZERO,
            last_report_ms: [None; 3],
            alert: AlertState::Normal,
            last_alert_ms: None,
        }
    }
}

/// What one call to [`ControlStage::process`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlOutcome {
    /// Metrics successfully reported, indexed by [`Metric::index`].
    pub reported: [bool; 3],
    /// Latch transition taken this cycle, if any.
    pub transition: Option<AlertState>,
}

impl ControlOutcome {
    pub fn reported_count(&self) -> usize {
        self.reported.iter().filter(|r| **r).count()
    }
}

pub struct ControlStage {
    state: ControlState,
    thresholds: ChangeThresholds,
    min_report_interval_ms: u64,
    ph_alert_limit: f32,
    alert_cooldown_ms: u64,
    processed: u64,
}

impl ControlStage {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            state: ControlState::default(),
            thresholds: config.report_thresholds,
            min_report_interval_ms: u64::from(config.min_report_interval_ms),
            ph_alert_limit: config.ph_alert_limit,
            alert_cooldown_ms: u64::from(config.alert_cooldown_ms),
            processed: 0,
        }
    }

    // ── Per-reading processing ────────────────────────────────

    /// Run the reporting gate and the alert latch for one reading.
    pub fn process(
        &mut self,
        reading: &Reading,
        now_ms: u64,
        hw: &mut impl ActuatorPort,
        reporter: &mut impl ReporterPort,
    ) -> ControlOutcome {
        self.processed += 1;
        let mut outcome = ControlOutcome::default();

        for metric in Metric::ALL {
            outcome.reported[metric.index()] = self.report_if_changed(metric, reading, now_ms, reporter);
        }

        outcome.transition = self.update_latch(reading.ph, now_ms, hw, reporter);

        info!(
            "pH: {:.2}, Turbidity: {:.2} NTU, Temp: {:.2} C",
            reading.ph, reading.turbidity_ntu, reading.temp_c
        );
        outcome
    }

    /// Apply a remote command and echo the new value upstream.
    pub fn apply_command(
        &mut self,
        cmd: ControlCommand,
        hw: &mut impl ActuatorPort,
        reporter: &mut impl ReporterPort,
    ) {
        match cmd {
            ControlCommand::SetServo(angle) => {
                if let Err(e) = hw.set_servo_angle(angle) {
                    warn!("Control: servo command {} failed: {}", angle, e);
                    return;
                }
                info!("Servo angle changed to: {} (remote)", angle);
                if let Err(e) = reporter.report_metric(
                    SERVO_DEVICE,
                    POWER_PARAM,
                    ParamValue::Bool(angle != SERVO_CLOSED),
                ) {
                    warn!("Control: servo state report failed: {}", e);
                }
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    pub fn alert_state(&self) -> AlertState {
        self.state.alert
    }

    /// Readings processed since startup.
    pub fn processed(&self) -> u64 {
        self.processed
    }

    // ── Internal ──────────────────────────────────────────────

    fn report_if_changed(
        &mut self,
        metric: Metric,
        reading: &Reading,
        now_ms: u64,
        reporter: &mut impl ReporterPort,
    ) -> bool {
        let value = reading.get(metric);
        if !changed(self.state.last.get(metric), value, metric.threshold(&self.thresholds)) {
            return false;
        }
        let rate_ok = match self.state.last_report_ms[metric.index()] {
            None => true,
            Some(t) => now_ms.saturating_sub(t) >= self.min_report_interval_ms,
        };
        if !rate_ok {
            return false;
        }

        match reporter.report_metric(metric.device_name(), metric.param_name(), ParamValue::Float(value)) {
            Ok(()) => {
                self.state.last.set(metric, value);
                self.state.last_report_ms[metric.index()] = Some(now_ms);
                info!("Updated {}: {:.2}", metric.param_name(), value);
                true
            }
            Err(e) => {
                warn!("Control: {} report failed: {}", metric.param_name(), e);
                false
            }
        }
    }

    fn cooldown_elapsed(&self, now_ms: u64) -> bool {
        match self.state.last_alert_ms {
            None => true,
            Some(t) => now_ms.saturating_sub(t) >= self.alert_cooldown_ms,
        }
    }

    fn update_latch(
        &mut self,
        ph: f32,
        now_ms: u64,
        hw: &mut impl ActuatorPort,
        reporter: &mut impl ReporterPort,
    ) -> Option<AlertState> {
        if !self.cooldown_elapsed(now_ms) {
            return None;
        }
        let next = match self.state.alert {
            AlertState::Normal if ph > self.ph_alert_limit => AlertState::Alerting,
            AlertState::Alerting if ph < self.ph_alert_limit => AlertState::Normal,
            _ => return None,
        };

        let alerting = next == AlertState::Alerting;
        let mut msg: String<64> = String::new();
        // 64 bytes hold either message for any finite pH; overflow truncates.
        let _ = if alerting {
            write!(msg, "pH {:.2} above limit, draining", ph)
        } else {
            write!(msg, "pH {:.2} back to normal", ph)
        };
        if let Err(e) = reporter.raise_alert(&msg) {
            warn!("Control: alert notification failed: {}", e);
        }

        // Each actuator is attempted even if an earlier one failed.
        let steps = [
            hw.set_gpio(pins::DRAIN_GPIO, alerting),
            hw.set_gpio(pins::INDICATOR_GPIO, alerting),
            hw.set_servo_angle(if alerting { SERVO_OPEN } else { SERVO_CLOSED }),
        ];
        for step in steps {
            if let Err(e) = step {
                warn!("Control: actuator step failed: {}", e);
            }
        }
        if let Err(e) = reporter.report_metric(DRAIN_DEVICE, POWER_PARAM, ParamValue::Bool(alerting)) {
            warn!("Control: drain state report failed: {}", e);
        }

        self.state.alert = next;
        self.state.last_alert_ms = Some(now_ms);
        warn!("Control: alert latch -> {:?} (pH {:.2})", next, ph);
        Some(next)
    }
}
