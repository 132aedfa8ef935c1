//! One-shot hardware peripheral initialization.
//!
//! Configures the ADC1 oneshot unit, the binary GPIO outputs and the servo
//! LEDC timer/channel using raw ESP-IDF sys calls.  Called once from
//! `main()` before the tasks are spawned.
//!
//! On host builds every accessor is backed by an in-memory simulation so
//! the drivers above can run unchanged in tests.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc)    => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed(rc)   => write!(f, "LEDC timer/channel config failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before any task is spawned.
    unsafe {
        init_adc()?;
        init_gpio_outputs()?;
        init_ledc()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: The handle is written once by `init_adc()` before the tasks
/// start.  Afterwards only the acquisition task reads through it.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    // 12 dB attenuation covers the full 0..3.3 V probe output.
    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    for channel in [pins::PH_ADC_CHANNEL, pins::TURBIDITY_ADC_CHANNEL] {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }
    }

    info!(
        "hw_init: ADC1 configured (CH{}=pH, CH{}=turbidity)",
        pins::PH_ADC_CHANNEL,
        pins::TURBIDITY_ADC_CHANNEL
    );
    Ok(())
}

/// One raw 12-bit conversion.  `Err` carries the driver return code.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> Result<u16, i32> {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract, acquisition task only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return Err(ret);
    }
    Ok(raw.clamp(0, pins::ADC_MAX_RAW as i32) as u16)
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(channel: u32) -> Result<u16, i32> {
    sim::adc_read(channel)
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let output_pins = [pins::DRAIN_GPIO, pins::INDICATOR_GPIO];

    for &pin in &output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
        // Drain closed and indicator dark until the first alert.
        unsafe { gpio_set_level(pin, 0) };
    }

    info!("hw_init: GPIO outputs configured (drain={}, indicator={})", pins::DRAIN_GPIO, pins::INDICATOR_GPIO);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) -> Result<(), i32> {
    // SAFETY: gpio_set_level writes to an output configured in
    // init_gpio_outputs(); only the control task drives outputs.
    let ret = unsafe { gpio_set_level(pin, u32::from(high)) };
    if ret != ESP_OK as i32 {
        return Err(ret);
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) -> Result<(), i32> {
    sim::gpio_write(pin, high);
    Ok(())
}

// ── LEDC PWM (servo) ─────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    // Timer 0: servo frame (50 Hz, 13-bit)
    let timer0 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_13_BIT,
        freq_hz: pins::SERVO_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&timer0) };
    if ret != ESP_OK as i32 { return Err(HwInitError::LedcInitFailed(ret)); }

    let ret = unsafe { ledc_channel_config(&ledc_channel_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        channel: pins::SERVO_LEDC_CHANNEL,
        timer_sel: ledc_timer_t_LEDC_TIMER_0,
        gpio_num: pins::SERVO_GPIO,
        duty: 0,
        hpoint: 0,
        ..Default::default()
    }) };
    if ret != ESP_OK as i32 { return Err(HwInitError::LedcInitFailed(ret)); }

    info!("hw_init: LEDC configured (servo=CH{} on GPIO{})", pins::SERVO_LEDC_CHANNEL, pins::SERVO_GPIO);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn ledc_set_duty(channel: u32, duty: u32) -> Result<(), i32> {
    // SAFETY: the channel was configured in init_ledc(); only the control
    // task writes duty registers.
    unsafe {
        let ret = esp_idf_svc::sys::ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty);
        if ret != ESP_OK as i32 {
            return Err(ret);
        }
        let ret = esp_idf_svc::sys::ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
        if ret != ESP_OK as i32 {
            return Err(ret);
        }
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set_duty(channel: u32, duty: u32) -> Result<(), i32> {
    sim::ledc_set_duty(channel, duty);
    Ok(())
}

// ── Host simulation ───────────────────────────────────────────

/// In-memory peripheral state for host builds.
///
/// ADC channels read back whatever was last stored with [`sim::set_adc`];
/// a channel that was never set reports a driver error.
#[cfg(not(target_os = "espidf"))]
pub mod sim {
    use core::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering};

    const ADC_CHANNELS: usize = 10;
    const UNSET: i32 = -1;
    const ESP_FAIL: i32 = -1;

    static ADC: [AtomicI32; ADC_CHANNELS] = [const { AtomicI32::new(UNSET) }; ADC_CHANNELS];
    static GPIO: [AtomicBool; 40] = [const { AtomicBool::new(false) }; 40];
    static LEDC_DUTY: [AtomicU32; 8] = [const { AtomicU32::new(0) }; 8];

    pub fn set_adc(channel: u32, raw: u16) {
        if let Some(slot) = ADC.get(channel as usize) {
            slot.store(i32::from(raw), Ordering::Relaxed);
        }
    }

    pub(super) fn adc_read(channel: u32) -> Result<u16, i32> {
        let raw = ADC.get(channel as usize).map_or(UNSET, |s| s.load(Ordering::Relaxed));
        if raw < 0 { Err(ESP_FAIL) } else { Ok(raw as u16) }
    }

    pub(super) fn gpio_write(pin: i32, high: bool) {
        if let Some(slot) = usize::try_from(pin).ok().and_then(|p| GPIO.get(p)) {
            slot.store(high, Ordering::Relaxed);
        }
    }

    pub fn gpio_level(pin: i32) -> bool {
        usize::try_from(pin)
            .ok()
            .and_then(|p| GPIO.get(p))
            .is_some_and(|s| s.load(Ordering::Relaxed))
    }

    pub(super) fn ledc_set_duty(channel: u32, duty: u32) {
        if let Some(slot) = LEDC_DUTY.get(channel as usize) {
            slot.store(duty, Ordering::Relaxed);
        }
    }

    pub fn ledc_duty(channel: u32) -> u32 {
        LEDC_DUTY.get(channel as usize).map_or(0, |s| s.load(Ordering::Relaxed))
    }
}
