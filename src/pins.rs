//! GPIO / peripheral pin assignments for the AquaSense controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Sensors: analog (ADC1)
// ---------------------------------------------------------------------------

/// Analog pH probe amplifier output.  ADC1 channel 7 (GPIO 35).
pub const PH_ADC_CHANNEL: u32 = 7;
/// Analog turbidity sensor output.  ADC1 channel 6 (GPIO 34).
pub const TURBIDITY_ADC_CHANNEL: u32 = 6;

/// ADC full-scale raw value at 12-bit width.
pub const ADC_MAX_RAW: f32 = 4095.0;
/// ADC reference voltage at 11 dB attenuation.
pub const ADC_VREF: f32 = 3.3;

// ---------------------------------------------------------------------------
// Actuators: digital outputs
// ---------------------------------------------------------------------------

/// Drain valve relay.  HIGH = draining.
pub const DRAIN_GPIO: i32 = 19;
/// Alarm indicator (audio module trigger).  HIGH = alarm active.
pub const INDICATOR_GPIO: i32 = 18;
/// Servo signal line (LEDC channel 0 output).
pub const SERVO_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// I²C bus (OLED display)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 21;
pub const I2C_SCL_GPIO: i32 = 22;

// ---------------------------------------------------------------------------
// Servo PWM configuration
// ---------------------------------------------------------------------------

/// LEDC channel driving the outlet servo.
pub const SERVO_LEDC_CHANNEL: u32 = 0;
/// Standard hobby-servo frame rate (20 ms period).
pub const SERVO_PWM_FREQ_HZ: u32 = 50;
/// LEDC timer resolution (bits).  13-bit gives 0 – 8191 duty levels.
pub const SERVO_PWM_RESOLUTION_BITS: u32 = 13;
