//! Display stage: redraws the three-line status screen when a reading
//! differs materially from what is currently shown.

use core::fmt::Write;

use heapless::String;
use log::{debug, warn};

use super::model::{Metric, Reading, changed};
use super::ports::DisplayPort;
use crate::config::{ChangeThresholds, MonitorConfig};

/// One rendered text row.
pub type DisplayLine = String<32>;

/// Snapshot of what the screen shows.  Owned by the display task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayState {
    pub last_shown: Reading,
    pub redraws: u32,
}

pub struct DisplayStage {
    state: DisplayState,
    thresholds: ChangeThresholds,
}

impl DisplayStage {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            state: DisplayState {
                last_shown: Reading::ZERO,
                redraws: 0,
            },
            thresholds: config.display_thresholds,
        }
    }

    /// Whether `reading` differs enough from the screen to redraw.
    pub fn needs_redraw(&self, reading: &Reading) -> bool {
        Metric::ALL.into_iter().any(|m| {
            changed(
                self.state.last_shown.get(m),
                reading.get(m),
                m.threshold(&self.thresholds),
            )
        })
    }

    /// Redraw if needed.  Returns `true` when the screen was redrawn.
    ///
    /// On a panel error the snapshot is left alone so the next reading
    /// retries the redraw.
    pub fn process(&mut self, reading: &Reading, display: &mut impl DisplayPort) -> bool {
        if !self.needs_redraw(reading) {
            debug!("Display: no material change");
            return false;
        }

        if let Err(e) = display.clear() {
            warn!("Display: clear failed: {}", e);
            return false;
        }
        for (row, line) in format_lines(reading).iter().enumerate() {
            if let Err(e) = display.render_line(row as u8, line) {
                warn!("Display: row {} failed: {}", row, e);
                return false;
            }
        }

        self.state.last_shown = *reading;
        self.state.redraws = self.state.redraws.wrapping_add(1);
        true
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }
}

/// Format the three status rows for `reading`.
pub fn format_lines(reading: &Reading) -> [DisplayLine; 3] {
    let mut temp = DisplayLine::new();
    let mut ntu = DisplayLine::new();
    let mut ph = DisplayLine::new();
    // 32 bytes hold any finite value the sensors produce; overflow truncates.
    let _ = write!(temp, " Temp: {:.2}C", reading.temp_c);
    let _ = write!(ntu, " ntu: {:.2}NTU", reading.turbidity_ntu);
    let _ = write!(ph, " pH: {:.2}", reading.ph);
    [temp, ntu, ph]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_match_panel_format() {
        let r = Reading {
            temp_c: 26.0,
            ph: 7.25,
            turbidity_ntu: 12.5,
            ..Reading::ZERO
        };
        let [t, n, p] = format_lines(&r);
        assert_eq!(t.as_str(), " Temp: 26.00C");
        assert_eq!(n.as_str(), " ntu: 12.50NTU");
        assert_eq!(p.as_str(), " pH: 7.25");
    }

    #[test]
    fn saturated_turbidity_fits_line() {
        let r = Reading {
            turbidity_ntu: 3000.0,
            ..Reading::ZERO
        };
        assert_eq!(format_lines(&r)[1].as_str(), " ntu: 3000.00NTU");
    }

    #[test]
    fn small_drift_needs_no_redraw() {
        let stage = DisplayStage::new(&MonitorConfig::default());
        let r = Reading {
            temp_c: 0.4,
            ph: 0.05,
            turbidity_ntu: 0.05,
            ..Reading::ZERO
        };
        assert!(!stage.needs_redraw(&r));
        assert!(stage.needs_redraw(&Reading { ph: 0.1, ..r }));
    }
}
