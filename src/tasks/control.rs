//! Control task: runs the control stage on each reading and applies
//! remote commands in between.
//!
//! The task is the single owner of the actuators.  Within one cycle it
//! waits up to the queue timeout for a reading, processes it, then spends
//! the rest of the cycle blocked on the command queue.

use std::io;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use log::{info, warn};

use super::Cadence;
use crate::app::control::{ControlOutcome, ControlStage};
use crate::app::ports::{ActuatorPort, ClockPort, ReporterPort};
use crate::drivers::task_pin::{Core, TaskSpec, spawn_on_core};
use crate::telemetry::{CommandQueue, TelemetryQueue};

pub const TASK: TaskSpec = TaskSpec {
    name: "control\0",
    core: Core::App,
    priority: 2,
    stack_kb: 6,
};

pub struct ControlTask<'q, H, R, C> {
    pub stage: ControlStage,
    pub hw: H,
    pub reporter: R,
    pub clock: C,
    readings: &'q TelemetryQueue,
    commands: &'q CommandQueue,
    queue_timeout: Duration,
}

impl<'q, H, R, C> ControlTask<'q, H, R, C>
where
    H: ActuatorPort,
    R: ReporterPort,
    C: ClockPort,
{
    pub fn new(
        stage: ControlStage,
        hw: H,
        reporter: R,
        clock: C,
        readings: &'q TelemetryQueue,
        commands: &'q CommandQueue,
        queue_timeout: Duration,
    ) -> Self {
        Self {
            stage,
            hw,
            reporter,
            clock,
            readings,
            commands,
            queue_timeout,
        }
    }

    /// Receive and process one reading.  `None` if none arrived in time;
    /// the stage keeps its previous state.
    pub fn control_cycle(&mut self) -> Option<ControlOutcome> {
        match self.readings.recv_timeout(self.queue_timeout) {
            Ok(reading) => {
                let now = self.clock.now_ms();
                Some(self.stage.process(&reading, now, &mut self.hw, &mut self.reporter))
            }
            Err(_) => {
                warn!("Control task: No data received");
                None
            }
        }
    }

    /// Apply remote commands as they arrive until `deadline`.  Returns the
    /// number applied.
    pub fn serve_commands_until(&mut self, deadline: Instant) -> usize {
        let mut applied = 0;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() {
                break;
            }
            match self.commands.recv_timeout(left) {
                Ok(cmd) => {
                    self.stage.apply_command(cmd, &mut self.hw, &mut self.reporter);
                    applied += 1;
                }
                Err(_) => break,
            }
        }
        applied
    }

    pub fn run(mut self, period: Duration) -> ! {
        info!("Control task: running every {:?}", period);
        let mut cadence = Cadence::new(period);
        loop {
            self.control_cycle();
            self.serve_commands_until(cadence.deadline());
            cadence.sleep_until_due();
        }
    }
}

pub fn spawn_control<H, R, C>(task: ControlTask<'static, H, R, C>, period: Duration) -> io::Result<JoinHandle<()>>
where
    H: ActuatorPort + Send + 'static,
    R: ReporterPort + Send + 'static,
    C: ClockPort + Send + 'static,
{
    spawn_on_core(TASK, move || task.run(period))
}
