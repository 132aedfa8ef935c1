//! Display stage: redraw gating and row rendering.

use std::time::Duration;

use aquasense::app::display::DisplayStage;
use aquasense::app::model::Reading;
use aquasense::config::MonitorConfig;
use aquasense::tasks::display::display_cycle;
use aquasense::telemetry::TelemetryQueue;

use crate::mock_hw::MockDisplay;

fn sample() -> Reading {
    Reading {
        temp_c: 26.0,
        ph: 7.4,
        turbidity_ntu: 120.25,
        ..Reading::ZERO
    }
}

#[test]
fn same_reading_twice_redraws_once() {
    let mut stage = DisplayStage::new(&MonitorConfig::default());
    let mut display = MockDisplay::new();

    assert!(stage.process(&sample(), &mut display));
    assert!(!stage.process(&sample(), &mut display));
    assert_eq!(display.clears, 1);
    assert_eq!(stage.state().redraws, 1);
}

#[test]
fn redraw_renders_three_rows() {
    let mut stage = DisplayStage::new(&MonitorConfig::default());
    let mut display = MockDisplay::new();
    stage.process(&sample(), &mut display);

    assert_eq!(
        display.lines,
        vec![
            (0, " Temp: 26.00C".to_string()),
            (1, " ntu: 120.25NTU".to_string()),
            (2, " pH: 7.40".to_string()),
        ]
    );
}

#[test]
fn panel_error_retries_next_reading() {
    let mut stage = DisplayStage::new(&MonitorConfig::default());
    let mut display = MockDisplay {
        fail: true,
        ..MockDisplay::default()
    };

    assert!(!stage.process(&sample(), &mut display));
    assert_eq!(stage.state().last_shown, Reading::ZERO);

    display.fail = false;
    assert!(stage.process(&sample(), &mut display));
}

#[test]
fn display_cycle_tolerates_empty_queue() {
    let queue = TelemetryQueue::new();
    let mut stage = DisplayStage::new(&MonitorConfig::default());
    let mut display = MockDisplay::new();
    let timeout = Duration::from_millis(10);

    assert_eq!(display_cycle(&mut stage, &mut display, &queue, timeout), None);

    queue.try_send(sample()).unwrap();
    assert_eq!(display_cycle(&mut stage, &mut display, &queue, timeout), Some(true));
}
