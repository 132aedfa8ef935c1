//! AquaSense Firmware: main entry point
//!
//! Three-task monitoring pipeline behind a hexagonal port boundary.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  Esp32Adc       HardwareAdapter   LogReporter   LogDisplay     │
//! │  (AdcPort)      (ActuatorPort)    (Reporter)    (DisplayPort)  │
//! │  Esp32Time      console ──▶ RemoteWriteHandler ──▶ cmd queue   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  sensor task ──▶ control queue ──▶ ControlStage (gate, latch)  │
//! │              └─▶ display queue ──▶ DisplayStage (redraw gate)  │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::{Context, Result};
use log::{error, info};

use aquasense::adapters::adc::Esp32Adc;
use aquasense::adapters::console::run_console;
use aquasense::adapters::hardware::HardwareAdapter;
use aquasense::adapters::log_display::LogDisplay;
use aquasense::adapters::log_reporter::LogReporter;
use aquasense::adapters::time::Esp32TimeAdapter;
use aquasense::app::commands::RemoteWriteHandler;
use aquasense::app::control::ControlStage;
use aquasense::app::display::DisplayStage;
use aquasense::app::model::ActuatorStatus;
use aquasense::config::MonitorConfig;
use aquasense::drivers::hw_init;
use aquasense::sensors::SensorHub;
use aquasense::sensors::temperature::FixedTemperature;
use aquasense::tasks::acquisition::spawn_acquisition;
use aquasense::tasks::control::{ControlTask, spawn_control};
use aquasense::tasks::display::spawn_display;
use aquasense::telemetry::{CommandQueue, Fanout, TelemetryQueue};

// ── Shared pipeline objects ───────────────────────────────────

static CONTROL_QUEUE: TelemetryQueue = TelemetryQueue::new();
static DISPLAY_QUEUE: TelemetryQueue = TelemetryQueue::new();
static COMMAND_QUEUE: CommandQueue = CommandQueue::new();
static ACTUATORS: ActuatorStatus = ActuatorStatus::new();

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  AquaSense v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = MonitorConfig::default();
    config.validate().context("configuration rejected")?;

    // ── 3. Hardware peripherals ───────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        error!("HAL init failed: {}, halting", e);
        return Err(e.into());
    }
    let mut hw = HardwareAdapter::new(&config, &ACTUATORS);
    hw.init_outputs().context("actuator init")?;

    // ── 4. Stages and adapters ────────────────────────────────
    let period = Duration::from_millis(u64::from(config.cycle_period_ms));
    let queue_timeout = Duration::from_millis(u64::from(config.queue_timeout_ms));

    let hub = SensorHub::new(
        Esp32Adc::new(),
        FixedTemperature::new(config.default_temperature_c),
        &config,
        &ACTUATORS,
    );
    let fanout = Fanout::new(&CONTROL_QUEUE, &DISPLAY_QUEUE, queue_timeout);
    let control = ControlTask::new(
        ControlStage::new(&config),
        hw,
        LogReporter::new(),
        Esp32TimeAdapter::new(),
        &CONTROL_QUEUE,
        &COMMAND_QUEUE,
        queue_timeout,
    );

    // ── 5. Tasks ──────────────────────────────────────────────
    let handles = [
        spawn_acquisition(hub, fanout, period).context("spawn sensor task")?,
        spawn_control(control, period).context("spawn control task")?,
        spawn_display(
            DisplayStage::new(&config),
            LogDisplay::new(),
            &DISPLAY_QUEUE,
            queue_timeout,
            period,
        )
        .context("spawn display task")?,
    ];
    info!("System ready. Pipeline running.");

    // ── 6. Remote writes from the console ─────────────────────
    let mut writes = RemoteWriteHandler::new(&COMMAND_QUEUE);
    run_console(std::io::stdin().lock(), &mut writes);

    for handle in handles {
        if handle.join().is_err() {
            error!("Pipeline task panicked");
        }
    }
    Ok(())
}
