//! End-to-end pipeline: acquisition → fan-out → both stages.

use std::time::{Duration, Instant};

use aquasense::adapters::adc::SimAdc;
use aquasense::adapters::hardware::HardwareAdapter;
use aquasense::adapters::log_display::LogDisplay;
use aquasense::adapters::log_reporter::LogReporter;
use aquasense::adapters::time::Esp32TimeAdapter;
use aquasense::app::commands::ControlCommand;
use aquasense::app::control::ControlStage;
use aquasense::app::display::DisplayStage;
use aquasense::app::model::{ActuatorStatus, Reading};
use aquasense::config::MonitorConfig;
use aquasense::pins;
use aquasense::sensors::SensorHub;
use aquasense::sensors::temperature::FixedTemperature;
use aquasense::tasks::acquisition::{acquisition_cycle, spawn_acquisition};
use aquasense::tasks::control::{ControlTask, spawn_control};
use aquasense::tasks::display::spawn_display;
use aquasense::telemetry::{CommandQueue, Fanout, TELEMETRY_DEPTH, TelemetryQueue};

use crate::mock_hw::{MockActuators, MockDisplay, MockReporter};

const TIMEOUT: Duration = Duration::from_millis(20);

fn reading(ph: f32) -> Reading {
    Reading { ph, ..Reading::ZERO }
}

#[test]
fn fanout_delivers_in_order_up_to_capacity() {
    let control = TelemetryQueue::new();
    let display = TelemetryQueue::new();
    let fan = Fanout::new(&control, &display, TIMEOUT);

    for i in 0..TELEMETRY_DEPTH {
        assert!(fan.publish(reading(i as f32)).all_delivered());
    }
    // Sixth reading: both queues full, dropped after the timeout.
    let report = fan.publish(reading(99.0));
    assert!(!report.control_delivered);
    assert!(!report.display_delivered);

    for q in [&control, &display] {
        let got: Vec<f32> = (0..TELEMETRY_DEPTH)
            .map(|_| q.try_recv().unwrap().ph)
            .collect();
        assert_eq!(got, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert!(q.is_empty());
    }
}

#[test]
fn acquisition_feeds_both_stages() {
    let config = MonitorConfig {
        turbidity_samples: 32,
        ..MonitorConfig::default()
    };
    let status = ActuatorStatus::new();
    let adc = SimAdc::new()
        .with_channel(pins::PH_ADC_CHANNEL, 1800) // ≈ 1.45 V, pH ≈ 12.7
        .with_channel(pins::TURBIDITY_ADC_CHANNEL, 4095);
    let mut hub = SensorHub::new(adc, FixedTemperature::new(26.0), &config, &status);

    let control_q = TelemetryQueue::new();
    let display_q = TelemetryQueue::new();
    let fan = Fanout::new(&control_q, &display_q, TIMEOUT);

    let (reading, report) = acquisition_cycle(&mut hub, &fan);
    assert!(report.all_delivered());
    assert_eq!(reading.turbidity_ntu, 0.0);
    assert!(reading.ph > 12.0);

    let mut control = ControlStage::new(&config);
    let mut hw = MockActuators::new();
    let mut rep = MockReporter::new();
    let out = control.process(&control_q.try_recv().unwrap(), 0, &mut hw, &mut rep);
    assert!(out.transition.is_some());

    let mut display = DisplayStage::new(&config);
    let mut panel = MockDisplay::new();
    assert!(display.process(&display_q.try_recv().unwrap(), &mut panel));
}

#[test]
fn actuator_state_rides_on_next_reading() {
    let config = MonitorConfig {
        turbidity_samples: 4,
        ..MonitorConfig::default()
    };
    let status = ActuatorStatus::new();
    let adc = SimAdc::new()
        .with_channel(pins::PH_ADC_CHANNEL, 3000)
        .with_channel(pins::TURBIDITY_ADC_CHANNEL, 3000);
    let mut hub = SensorHub::new(adc, FixedTemperature::new(26.0), &config, &status);

    assert!(!hub.acquire().drain_on);
    status.record_drain(true);
    status.record_servo(1);
    let r = hub.acquire();
    assert!(r.drain_on);
    assert_eq!(r.servo_angle, 1);
}

/// Poll `cond` until it holds or `limit` passes.
fn wait_for(limit: Duration, cond: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + limit;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    cond()
}

#[test]
fn spawned_tasks_latch_drain_and_serve_commands() {
    static CONTROL_Q: TelemetryQueue = TelemetryQueue::new();
    static DISPLAY_Q: TelemetryQueue = TelemetryQueue::new();
    static COMMANDS: CommandQueue = CommandQueue::new();
    static STATUS: ActuatorStatus = ActuatorStatus::new();

    let config = MonitorConfig {
        turbidity_samples: 8,
        ..MonitorConfig::default()
    };
    let period = Duration::from_millis(50);
    let timeout = Duration::from_millis(20);

    let adc = SimAdc::new()
        .with_channel(pins::PH_ADC_CHANNEL, 1800) // pH ≈ 12.7, above the limit
        .with_channel(pins::TURBIDITY_ADC_CHANNEL, 4095);
    let hub = SensorHub::new(adc, FixedTemperature::new(26.0), &config, &STATUS);
    let control = ControlTask::new(
        ControlStage::new(&config),
        HardwareAdapter::new(&config, &STATUS),
        LogReporter::new(),
        Esp32TimeAdapter::new(),
        &CONTROL_Q,
        &COMMANDS,
        timeout,
    );

    // The loops never return; the handles are dropped and the threads
    // end with the test process.
    spawn_acquisition(hub, Fanout::new(&CONTROL_Q, &DISPLAY_Q, timeout), period).unwrap();
    spawn_control(control, period).unwrap();
    spawn_display(DisplayStage::new(&config), LogDisplay::new(), &DISPLAY_Q, timeout, period).unwrap();

    assert!(wait_for(Duration::from_secs(2), || STATUS.drain_on()));
    assert_eq!(STATUS.servo_angle(), 1);

    // A remote write reaches the control task between readings.
    COMMANDS.try_send(ControlCommand::SetServo(0)).unwrap();
    assert!(wait_for(Duration::from_secs(2), || STATUS.servo_angle() == 0));
    assert!(STATUS.drain_on());

    // Both consumers keep up with the producer.
    assert!(wait_for(Duration::from_secs(1), || DISPLAY_Q.len() < TELEMETRY_DEPTH));
    assert!(CONTROL_Q.len() < TELEMETRY_DEPTH);
}
