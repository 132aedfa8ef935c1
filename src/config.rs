//! System configuration parameters
//!
//! All tunable parameters for the AquaSense monitoring loop.
//! Values are compiled-in defaults; [`MonitorConfig::validate`] runs once
//! at boot and a failure is fatal.

use serde::{Deserialize, Serialize};

/// Change thresholds for one consumer (control or display).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChangeThresholds {
    /// Temperature change (°C) considered material.
    pub temp_c: f32,
    /// pH change considered material.
    pub ph: f32,
    /// Turbidity change (NTU) considered material.
    pub turbidity_ntu: f32,
}

impl Default for ChangeThresholds {
    fn default() -> Self {
        Self {
            temp_c: 0.5,
            ph: 0.1,
            turbidity_ntu: 0.1,
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    // --- Timing ---
    /// Cycle period shared by all three tasks (milliseconds)
    pub cycle_period_ms: u32,
    /// Maximum blocking time for a queue send or receive (milliseconds)
    pub queue_timeout_ms: u32,

    // --- Reporting ---
    /// Thresholds gating upstream reports
    pub report_thresholds: ChangeThresholds,
    /// Minimum interval between two reports of the same metric (milliseconds)
    pub min_report_interval_ms: u32,

    // --- Display ---
    /// Thresholds gating a display redraw
    pub display_thresholds: ChangeThresholds,

    // --- Alerting ---
    /// pH above which the drain opens
    pub ph_alert_limit: f32,
    /// Minimum time between two alert latch transitions (milliseconds)
    pub alert_cooldown_ms: u32,

    // --- Sensors ---
    /// Raw samples averaged per turbidity reading
    pub turbidity_samples: u16,
    /// Value reported by the placeholder temperature sensor (°C)
    pub default_temperature_c: f32,

    // --- Servo ---
    /// Shortest servo pulse (milliseconds)
    pub servo_pulse_min_ms: f32,
    /// Longest servo pulse (milliseconds), also the closed position
    pub servo_pulse_max_ms: f32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            // Timing
            cycle_period_ms: 10_000,
            queue_timeout_ms: 100,

            // Reporting
            report_thresholds: ChangeThresholds::default(),
            min_report_interval_ms: 1_000,

            // Display
            display_thresholds: ChangeThresholds::default(),

            // Alerting
            ph_alert_limit: 8.10,
            alert_cooldown_ms: 60_000,

            // Sensors
            turbidity_samples: 800,
            default_temperature_c: 26.0,

            // Servo
            servo_pulse_min_ms: 0.06,
            servo_pulse_max_ms: 2.1,
        }
    }
}

/// A config field failed range validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigError(pub &'static str);

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "validation failed: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

impl MonitorConfig {
    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cycle_period_ms == 0 {
            return Err(ConfigError("cycle_period_ms must be > 0"));
        }
        if self.queue_timeout_ms >= self.cycle_period_ms {
            return Err(ConfigError("queue_timeout_ms must be shorter than a cycle"));
        }
        for t in [self.report_thresholds, self.display_thresholds] {
            if !(t.temp_c > 0.0 && t.ph > 0.0 && t.turbidity_ntu > 0.0) {
                return Err(ConfigError("change thresholds must be positive"));
            }
        }
        if !(0.0..=14.0).contains(&self.ph_alert_limit) {
            return Err(ConfigError("ph_alert_limit outside 0..=14"));
        }
        if self.turbidity_samples == 0 {
            return Err(ConfigError("turbidity_samples must be > 0"));
        }
        if !self.default_temperature_c.is_finite() {
            return Err(ConfigError("default_temperature_c must be finite"));
        }
        if !(self.servo_pulse_min_ms > 0.0 && self.servo_pulse_min_ms < self.servo_pulse_max_ms) {
            return Err(ConfigError("servo pulse range must satisfy 0 < min < max"));
        }
        if self.servo_pulse_max_ms > 20.0 {
            return Err(ConfigError("servo pulse longer than the 20 ms frame"));
        }
        Ok(())
    }

    /// Servo pulse for the open position: midpoint of the configured range.
    pub fn servo_open_ms(&self) -> f32 {
        (self.servo_pulse_min_ms + self.servo_pulse_max_ms) / 2.0
    }
}
