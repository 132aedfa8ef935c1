//! Display task: redraws the status screen from the display queue.

use std::io;
use std::thread::JoinHandle;
use std::time::Duration;

use log::{debug, info};

use super::Cadence;
use crate::app::display::DisplayStage;
use crate::app::ports::DisplayPort;
use crate::drivers::task_pin::{Core, TaskSpec, spawn_on_core};
use crate::telemetry::TelemetryQueue;

pub const TASK: TaskSpec = TaskSpec {
    name: "display\0",
    core: Core::App,
    priority: 2,
    stack_kb: 6,
};

/// One display cycle: `Some(redrawn)` when a reading arrived in time.
pub fn display_cycle(
    stage: &mut DisplayStage,
    display: &mut impl DisplayPort,
    readings: &TelemetryQueue,
    queue_timeout: Duration,
) -> Option<bool> {
    match readings.recv_timeout(queue_timeout) {
        Ok(reading) => {
            debug!("Display task: Received data from queue");
            Some(stage.process(&reading, display))
        }
        Err(_) => {
            info!("Display task: No data received");
            None
        }
    }
}

pub fn run_display<D: DisplayPort>(
    mut stage: DisplayStage,
    mut display: D,
    readings: &TelemetryQueue,
    queue_timeout: Duration,
    period: Duration,
) -> ! {
    info!("Display task: running every {:?}", period);
    let mut cadence = Cadence::new(period);
    loop {
        display_cycle(&mut stage, &mut display, readings, queue_timeout);
        cadence.sleep_until_due();
    }
}

pub fn spawn_display<D: DisplayPort + Send + 'static>(
    stage: DisplayStage,
    display: D,
    readings: &'static TelemetryQueue,
    queue_timeout: Duration,
    period: Duration,
) -> io::Result<JoinHandle<()>> {
    spawn_on_core(TASK, move || run_display(stage, display, readings, queue_timeout, period))
}
