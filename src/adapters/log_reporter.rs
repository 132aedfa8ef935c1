//! Log-based device-management bridge.
//!
//! Implements [`ReporterPort`] by writing every parameter update and alert
//! to the ESP-IDF logger.  Only the parameters the node registers are
//! accepted; anything else is rejected as [`ReportError::UnknownParam`].
//! A cloud-backed bridge would implement the same trait.

use log::{info, warn};

use crate::app::commands::{DRAIN_DEVICE, POWER_PARAM, SERVO_DEVICE};
use crate::app::model::Metric;
use crate::app::ports::{ParamValue, ReportError, ReporterPort};

/// Every (device, parameter) pair the node exposes.
pub const REGISTERED_PARAMS: [(&str, &str); 5] = [
    (Metric::Temperature.device_name(), Metric::Temperature.param_name()),
    (Metric::Ph.device_name(), Metric::Ph.param_name()),
    (Metric::Turbidity.device_name(), Metric::Turbidity.param_name()),
    (SERVO_DEVICE, POWER_PARAM),
    (DRAIN_DEVICE, POWER_PARAM),
];

pub fn is_registered(device: &str, param: &str) -> bool {
    REGISTERED_PARAMS
        .iter()
        .any(|(d, p)| *d == device && *p == param)
}

/// Adapter that logs every report to the serial console.
#[derive(Debug, Default)]
pub struct LogReporter {
    reports: u32,
    alerts: u32,
}

impl LogReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> u32 {
        self.reports
    }

    pub fn alerts(&self) -> u32 {
        self.alerts
    }
}

impl ReporterPort for LogReporter {
    fn report_metric(
        &mut self,
        device: &str,
        param: &str,
        value: ParamValue,
    ) -> Result<(), ReportError> {
        if !is_registered(device, param) {
            warn!("REPORT | rejected {} - {}", device, param);
            return Err(ReportError::UnknownParam);
        }
        self.reports = self.reports.wrapping_add(1);
        info!("REPORT | {} - {} = {}", device, param, value);
        Ok(())
    }

    fn raise_alert(&mut self, message: &str) -> Result<(), ReportError> {
        self.alerts = self.alerts.wrapping_add(1);
        warn!("ALERT | {}", message);
        Ok(())
    }
}
