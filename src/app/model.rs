//! Value types flowing through the pipeline.

use core::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use crate::config::ChangeThresholds;

/// Upper bound of the turbidity scale (sensor saturation).
pub const TURBIDITY_MAX_NTU: f32 = 3000.0;

/// One acquisition cycle's worth of water-quality data.
///
/// Copied by value into each telemetry queue; the two consumers never
/// alias the same instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Water temperature (°C).
    pub temp_c: f32,
    /// pH (unitless).
    pub ph: f32,
    /// Turbidity (NTU), always within `0.0..=3000.0`.
    pub turbidity_ntu: f32,
    /// Drain valve state at acquisition time (carried, not sensed).
    pub drain_on: bool,
    /// Last commanded servo angle (carried, not sensed).
    pub servo_angle: i32,
}

impl Reading {
    /// Startup default for every stage's "last seen" snapshot.
    pub const ZERO: Self = Self {
        temp_c: 0.0,
        ph: 0.0,
        turbidity_ntu: 0.0,
        drain_on: false,
        servo_angle: 0,
    };

    /// Enforce the value invariants: every float finite, turbidity on scale.
    ///
    /// A non-finite field falls back to the same field of `previous`.
    pub fn sanitized(self, previous: &Reading) -> Self {
        let pick = |v: f32, prev: f32| if v.is_finite() { v } else { prev };
        Self {
            temp_c: pick(self.temp_c, previous.temp_c),
            ph: pick(self.ph, previous.ph),
            turbidity_ntu: pick(self.turbidity_ntu, previous.turbidity_ntu)
                .clamp(0.0, TURBIDITY_MAX_NTU),
            ..self
        }
    }

    /// Value of one metric.
    pub fn get(&self, metric: Metric) -> f32 {
        match metric {
            Metric::Temperature => self.temp_c,
            Metric::Ph => self.ph,
            Metric::Turbidity => self.turbidity_ntu,
        }
    }

    /// Overwrite one metric.
    pub fn set(&mut self, metric: Metric, value: f32) {
        match metric {
            Metric::Temperature => self.temp_c = value,
            Metric::Ph => self.ph = value,
            Metric::Turbidity => self.turbidity_ntu = value,
        }
    }
}

impl Default for Reading {
    fn default() -> Self {
        Self::ZERO
    }
}

/// The three sensed quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Temperature,
    Ph,
    Turbidity,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Temperature, Metric::Ph, Metric::Turbidity];

    /// Stable index for per-metric arrays.
    pub const fn index(self) -> usize {
        match self {
            Self::Temperature => 0,
            Self::Ph => 1,
            Self::Turbidity => 2,
        }
    }

    /// Remote device this metric is reported under.
    pub const fn device_name(self) -> &'static str {
        match self {
            Self::Temperature => "Temperature Sensor",
            Self::Ph => "pH Sensor",
            Self::Turbidity => "Turbidity Sensor",
        }
    }

    /// Remote parameter name on that device.
    pub const fn param_name(self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::Ph => "pH",
            Self::Turbidity => "Turbidity",
        }
    }

    /// Threshold for this metric out of a threshold set.
    pub fn threshold(self, t: &ChangeThresholds) -> f32 {
        match self {
            Self::Temperature => t.temp_c,
            Self::Ph => t.ph,
            Self::Turbidity => t.turbidity_ntu,
        }
    }
}

/// Last applied actuator state, published for the acquisition task.
///
/// Written only by the hardware adapter (owned by the control task) and
/// read by the sensor hub when it stamps a new [`Reading`].  Lock-free.
#[derive(Debug, Default)]
pub struct ActuatorStatus {
    drain_on: AtomicBool,
    servo_angle: AtomicI32,
}

impl ActuatorStatus {
    pub const fn new() -> Self {
        Self {
            drain_on: AtomicBool::new(false),
            servo_angle: AtomicI32::new(0),
        }
    }

    pub fn record_drain(&self, on: bool) {
        self.drain_on.store(on, Ordering::Release);
    }

    pub fn record_servo(&self, angle: i32) {
        self.servo_angle.store(angle, Ordering::Release);
    }

    pub fn drain_on(&self) -> bool {
        self.drain_on.load(Ordering::Acquire)
    }

    pub fn servo_angle(&self) -> i32 {
        self.servo_angle.load(Ordering::Acquire)
    }
}

/// Whether `|new - old|` meets `threshold`.
pub fn changed(old: f32, new: f32, threshold: f32) -> bool {
    (new - old).abs() >= threshold
}
