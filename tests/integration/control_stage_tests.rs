//! Control stage: change-gated reporting and the pH alert latch.

use std::time::{Duration, Instant};

use aquasense::app::commands::{ControlCommand, RemoteWriteHandler};
use aquasense::app::control::{AlertState, ControlStage};
use aquasense::app::model::{Metric, Reading};
use aquasense::app::ports::{ParamValue, WriteRequestHandler};
use aquasense::config::MonitorConfig;
use aquasense::pins;
use aquasense::tasks::control::ControlTask;
use aquasense::telemetry::{CommandQueue, TelemetryQueue};

use crate::mock_hw::{ManualClock, MockActuators, MockReporter};

fn reading(temp_c: f32, ph: f32) -> Reading {
    Reading {
        temp_c,
        ph,
        turbidity_ntu: 0.0,
        ..Reading::ZERO
    }
}

fn stage() -> ControlStage {
    ControlStage::new(&MonitorConfig::default())
}

// ── Reporting gate ────────────────────────────────────────────

#[test]
fn temperature_below_threshold_is_not_reported() {
    let mut s = stage();
    let mut hw = MockActuators::new();
    let mut rep = MockReporter::new();

    s.process(&reading(25.0, 7.0), 0, &mut hw, &mut rep);
    let out = s.process(&reading(25.3, 7.0), 10_000, &mut hw, &mut rep);
    assert!(!out.reported[Metric::Temperature.index()]);

    let out = s.process(&reading(25.6, 7.0), 20_000, &mut hw, &mut rep);
    assert!(out.reported[Metric::Temperature.index()]);
    assert_eq!(
        rep.reports_for("Temperature Sensor"),
        vec![ParamValue::Float(25.0), ParamValue::Float(25.6)]
    );
}

#[test]
fn drift_accumulates_against_last_report() {
    let mut s = stage();
    let mut hw = MockActuators::new();
    let mut rep = MockReporter::new();

    s.process(&reading(25.0, 7.0), 0, &mut hw, &mut rep);
    // 0.3 then another 0.3: the second step is 0.6 from the last report.
    s.process(&reading(25.3, 7.0), 10_000, &mut hw, &mut rep);
    let out = s.process(&reading(25.6, 7.0), 20_000, &mut hw, &mut rep);
    assert!(out.reported[Metric::Temperature.index()]);
}

#[test]
fn failed_report_is_retried_next_cycle() {
    let mut s = stage();
    let mut hw = MockActuators::new();
    let mut rep = MockReporter {
        offline: true,
        ..MockReporter::default()
    };

    let out = s.process(&reading(26.0, 7.2), 0, &mut hw, &mut rep);
    assert_eq!(out.reported_count(), 0);
    assert_eq!(s.state().last, Reading::ZERO);

    rep.offline = false;
    let out = s.process(&reading(26.0, 7.2), 10_000, &mut hw, &mut rep);
    assert!(out.reported[Metric::Temperature.index()]);
    assert!(out.reported[Metric::Ph.index()]);
    assert_eq!(s.state().last_report_ms[Metric::Ph.index()], Some(10_000));
}

// ── Alert latch ───────────────────────────────────────────────

#[test]
fn ph_sequence_trips_latch_exactly_once() {
    let mut s = stage();
    let mut hw = MockActuators::new();
    let mut rep = MockReporter::new();

    let mut transitions = Vec::new();
    for (i, ph) in [8.05, 8.15, 8.20].into_iter().enumerate() {
        let out = s.process(&reading(26.0, ph), i as u64 * 60_000, &mut hw, &mut rep);
        transitions.push(out.transition);
    }
    assert_eq!(transitions, vec![None, Some(AlertState::Alerting), None]);
    assert_eq!(rep.alerts.len(), 1);

    assert_eq!(hw.gpio_level(pins::DRAIN_GPIO), Some(true));
    assert_eq!(hw.gpio_level(pins::INDICATOR_GPIO), Some(true));
    assert_eq!(hw.servo(), Some(1));
    assert_eq!(rep.reports_for("Water Drain"), vec![ParamValue::Bool(true)]);
}

#[test]
fn crossings_inside_cooldown_transition_once() {
    let mut s = stage();
    let mut hw = MockActuators::new();
    let mut rep = MockReporter::new();

    assert_eq!(
        s.process(&reading(26.0, 8.5), 0, &mut hw, &mut rep).transition,
        Some(AlertState::Alerting)
    );
    assert_eq!(s.process(&reading(26.0, 7.0), 59_999, &mut hw, &mut rep).transition, None);
    assert_eq!(s.alert_state(), AlertState::Alerting);

    let out = s.process(&reading(26.0, 7.0), 60_000, &mut hw, &mut rep);
    assert_eq!(out.transition, Some(AlertState::Normal));
    assert_eq!(hw.gpio_level(pins::DRAIN_GPIO), Some(false));
    assert_eq!(hw.servo(), Some(0));
    assert_eq!(rep.alerts.len(), 2);
}

#[test]
fn actuator_failure_does_not_block_latch() {
    let mut s = stage();
    let mut hw = MockActuators {
        fail_gpio: true,
        ..MockActuators::default()
    };
    let mut rep = MockReporter::new();

    let out = s.process(&reading(26.0, 9.0), 0, &mut hw, &mut rep);
    assert_eq!(out.transition, Some(AlertState::Alerting));
    // Servo still commanded after both GPIO writes failed.
    assert_eq!(hw.servo(), Some(1));
}

// ── Remote commands ───────────────────────────────────────────

#[test]
fn remote_servo_command_is_echoed() {
    let mut s = stage();
    let mut hw = MockActuators::new();
    let mut rep = MockReporter::new();

    s.apply_command(ControlCommand::SetServo(1), &mut hw, &mut rep);
    assert_eq!(hw.servo(), Some(1));
    assert_eq!(rep.reports_for("Servo"), vec![ParamValue::Bool(true)]);
}

#[test]
fn control_task_serves_queued_writes() {
    let readings = TelemetryQueue::new();
    let commands = CommandQueue::new();
    let mut task = ControlTask::new(
        stage(),
        MockActuators::new(),
        MockReporter::new(),
        ManualClock::at(0),
        &readings,
        &commands,
        Duration::from_millis(10),
    );

    // Empty queue: the cycle is skipped, not fatal.
    assert!(task.control_cycle().is_none());

    readings.try_send(reading(26.0, 7.0)).unwrap();
    let out = task.control_cycle().unwrap();
    assert_eq!(out.reported_count(), 2);
    assert_eq!(task.stage.processed(), 1);

    let mut writes = RemoteWriteHandler::new(&commands);
    writes.on_write("Servo", "Power", ParamValue::Bool(true)).unwrap();
    writes.on_write("Servo", "Power", ParamValue::Bool(false)).unwrap();
    let applied = task.serve_commands_until(Instant::now() + Duration::from_millis(50));
    assert_eq!(applied, 2);
    assert_eq!(task.hw.servo(), Some(0));
}

#[test]
fn alert_notices_name_the_ph_value() {
    let mut s = stage();
    let mut hw = MockActuators::new();
    let mut rep = MockReporter::new();

    s.process(&reading(26.0, 8.25), 0, &mut hw, &mut rep);
    s.process(&reading(26.0, 7.90), 120_000, &mut hw, &mut rep);

    assert_eq!(
        rep.alerts,
        vec!["pH 8.25 above limit, draining".to_string(), "pH 7.90 back to normal".to_string()]
    );
}
