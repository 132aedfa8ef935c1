//! The three pipeline tasks and their shared cadence.
//!
//! ```text
//!  acquisition (pri 3) ──▶ control queue ──▶ control (pri 2) ◀── command queue
//!                      └─▶ display queue ──▶ display (pri 2)
//! ```
//!
//! Each task owns its stage state outright; the only shared objects are
//! the queues and the read-only [`ActuatorStatus`](crate::app::model::ActuatorStatus).
//! Every task runs once per cycle period and sleeps to a fixed deadline,
//! so processing time does not accumulate into drift.

pub mod acquisition;
pub mod control;
pub mod display;

use std::time::{Duration, Instant};

use log::warn;

/// Fixed-period deadline tracker.
#[derive(Debug, Clone, Copy)]
pub struct Cadence {
    period: Duration,
    next: Instant,
}

impl Cadence {
    /// First deadline is one period from now.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next: Instant::now() + period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// End of the current cycle.
    pub fn deadline(&self) -> Instant {
        self.next
    }

    /// Time left in the current cycle (zero once overrun).
    pub fn remaining(&self) -> Duration {
        self.next.saturating_duration_since(Instant::now())
    }

    /// Sleep out the rest of the cycle and move to the next deadline.
    pub fn sleep_until_due(&mut self) {
        let left = self.remaining();
        if !left.is_zero() {
            std::thread::sleep(left);
        }
        self.advance(Instant::now());
    }

    /// Move to the next deadline.  An overrun of a whole period or more
    /// re-anchors on `now` instead of firing a burst of late cycles.
    pub fn advance(&mut self, now: Instant) {
        self.next += self.period;
        if self.next <= now {
            warn!("Cadence: cycle overran by {:?}, resyncing", now - self.next);
            self.next = now + self.period;
        }
    }
}
