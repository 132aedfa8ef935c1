//! Acquisition task: samples every sensor once per cycle and fans the
//! reading out to the control and display queues.

use std::io;
use std::thread::JoinHandle;
use std::time::Duration;

use log::info;

use super::Cadence;
use crate::app::model::Reading;
use crate::app::ports::AdcPort;
use crate::drivers::task_pin::{Core, TaskSpec, spawn_on_core};
use crate::sensors::SensorHub;
use crate::sensors::temperature::TemperatureSource;
use crate::telemetry::{Fanout, FanoutReport};

pub const TASK: TaskSpec = TaskSpec {
    name: "sensor\0",
    core: Core::App,
    priority: 3,
    stack_kb: 6,
};

/// One acquisition cycle.
pub fn acquisition_cycle<A: AdcPort, T: TemperatureSource>(
    hub: &mut SensorHub<'_, A, T>,
    fanout: &Fanout<'_>,
) -> (Reading, FanoutReport) {
    let reading = hub.acquire();
    let report = fanout.publish(reading);
    (reading, report)
}

pub fn run_acquisition<A: AdcPort, T: TemperatureSource>(
    mut hub: SensorHub<'_, A, T>,
    fanout: Fanout<'_>,
    period: Duration,
) -> ! {
    info!("Sensor task: running every {:?}", period);
    let mut cadence = Cadence::new(period);
    loop {
        acquisition_cycle(&mut hub, &fanout);
        cadence.sleep_until_due();
    }
}

pub fn spawn_acquisition<A, T>(
    hub: SensorHub<'static, A, T>,
    fanout: Fanout<'static>,
    period: Duration,
) -> io::Result<JoinHandle<()>>
where
    A: AdcPort + Send + 'static,
    T: TemperatureSource + Send + 'static,
{
    spawn_on_core(TASK, move || run_acquisition(hub, fanout, period))
}
