//! ADC adapters.
//!
//! [`Esp32Adc`] reads ADC1 through the oneshot driver configured in
//! `hw_init` (the in-memory simulation on host builds).  [`SimAdc`] is a
//! self-contained stand-in with per-channel values and fault injection,
//! used for host runs and tests.

use crate::app::ports::AdcPort;
use crate::drivers::hw_init;
use crate::error::SensorError;

/// ADC1 oneshot adapter.
#[derive(Debug, Default)]
pub struct Esp32Adc {
    failures: u32,
}

impl Esp32Adc {
    /// `hw_init::init_peripherals()` must have succeeded first.
    pub fn new() -> Self {
        Self { failures: 0 }
    }

    /// Conversions that failed since boot.
    pub fn failures(&self) -> u32 {
        self.failures
    }
}

impl AdcPort for Esp32Adc {
    fn read_raw(&mut self, channel: u32) -> Result<u16, SensorError> {
        hw_init::adc1_read(channel).map_err(|rc| {
            self.failures = self.failures.wrapping_add(1);
            if self.failures.is_power_of_two() {
                log::warn!("ADC1 CH{} read failed (rc={}, {} total)", channel, rc, self.failures);
            }
            SensorError::AdcReadFailed
        })
    }
}

const SIM_CHANNELS: usize = 10;

/// In-memory ADC with a fixed raw value per channel.
#[derive(Debug, Clone)]
pub struct SimAdc {
    raw: [Option<u16>; SIM_CHANNELS],
    /// Fail every n-th conversion (0 = never).
    fail_every: u32,
    reads: u32,
}

impl Default for SimAdc {
    fn default() -> Self {
        Self::new()
    }
}

impl SimAdc {
    pub fn new() -> Self {
        Self {
            raw: [None; SIM_CHANNELS],
            fail_every: 0,
            reads: 0,
        }
    }

    pub fn with_channel(mut self, channel: u32, raw: u16) -> Self {
        self.set(channel, raw);
        self
    }

    pub fn set(&mut self, channel: u32, raw: u16) {
        if let Some(slot) = self.raw.get_mut(channel as usize) {
            *slot = Some(raw.min(4095));
        }
    }

    pub fn fail_every(&mut self, n: u32) {
        self.fail_every = n;
    }

    pub fn reads(&self) -> u32 {
        self.reads
    }
}

impl AdcPort for SimAdc {
    fn read_raw(&mut self, channel: u32) -> Result<u16, SensorError> {
        self.reads = self.reads.wrapping_add(1);
        if self.fail_every != 0 && self.reads % self.fail_every == 0 {
            return Err(SensorError::AdcReadFailed);
        }
        self.raw
            .get(channel as usize)
            .copied()
            .flatten()
            .ok_or(SensorError::AdcReadFailed)
    }
}
