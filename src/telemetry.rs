//! Telemetry queue fabric.
//!
//! Uses `embassy-sync` bounded channels to connect the acquisition task
//! with its two consumers.  Every queue is a fixed-capacity FIFO with no
//! heap allocation, so the production queues can live in statics.
//!
//! ```text
//!                         ┌───────────────┐   ┌───────────────┐
//!                  ┌─────▶│ CONTROL queue │──▶│ Control task  │◀── COMMAND queue
//! ┌─────────────┐  │      └───────────────┘   └───────────────┘    (remote writes)
//! │ Acquisition │──┤ copy
//! └─────────────┘  │      ┌───────────────┐   ┌───────────────┐
//!                  └─────▶│ DISPLAY queue │──▶│ Display task  │
//!                         └───────────────┘   └───────────────┘
//! ```
//!
//! Sends and receives are bounded waits: a full queue drops the item
//! after the timeout and an empty queue reports `Empty`.  Neither ever
//! blocks a task indefinitely.

use core::future::Future;
use core::time::Duration;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::{debug, warn};

use crate::app::commands::ControlCommand;
use crate::app::model::Reading;

/// Depth of each reading queue.
pub const TELEMETRY_DEPTH: usize = 5;

/// Depth of the remote command queue.
pub const COMMAND_DEPTH: usize = 4;

/// Reading queue feeding one consumer stage.
pub type TelemetryQueue = BoundedQueue<Reading, TELEMETRY_DEPTH>;

/// Remote command queue feeding the control stage.
pub type CommandQueue = BoundedQueue<ControlCommand, COMMAND_DEPTH>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// No space became available before the timeout; the item was dropped.
    Full,
    /// Nothing arrived before the timeout.
    Empty,
}

impl core::fmt::Display for QueueError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Full => write!(f, "queue full"),
            Self::Empty => write!(f, "queue empty"),
        }
    }
}

impl std::error::Error for QueueError {}

/// Fixed-capacity FIFO shared between threads.
pub struct BoundedQueue<T, const N: usize> {
    channel: Channel<CriticalSectionRawMutex, T, N>,
}

impl<T, const N: usize> Default for BoundedQueue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> BoundedQueue<T, N> {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Enqueue without waiting.
    pub fn try_send(&self, item: T) -> Result<(), QueueError> {
        self.channel.try_send(item).map_err(|_| QueueError::Full)
    }

    /// Enqueue, waiting at most `timeout` for space.
    pub fn send_timeout(&self, item: T, timeout: Duration) -> Result<(), QueueError> {
        // Fast path: no reactor round-trip while there is room.
        let item = match self.channel.try_send(item) {
            Ok(()) => return Ok(()),
            Err(embassy_sync::channel::TrySendError::Full(item)) => item,
        };
        with_timeout(self.channel.send(item), timeout).ok_or(QueueError::Full)
    }

    /// Dequeue without waiting.
    pub fn try_recv(&self) -> Result<T, QueueError> {
        self.channel.try_receive().map_err(|_| QueueError::Empty)
    }

    /// Dequeue, waiting at most `timeout` for an item.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<T, QueueError> {
        if let Ok(item) = self.channel.try_receive() {
            return Ok(item);
        }
        with_timeout(self.channel.receive(), timeout).ok_or(QueueError::Empty)
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.channel.is_full()
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

/// Drive `fut` on the calling thread until it completes or `timeout` passes.
fn with_timeout<F: Future>(fut: F, timeout: Duration) -> Option<F::Output> {
    futures_lite::future::block_on(futures_lite::future::or(
        async { Some(fut.await) },
        async {
            async_io_mini::Timer::after(timeout).await;
            None
        },
    ))
}

// ── Fan-out ──────────────────────────────────────────────────

/// Outcome of publishing one reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanoutReport {
    pub control_delivered: bool,
    pub display_delivered: bool,
}

impl FanoutReport {
    pub fn all_delivered(&self) -> bool {
        self.control_delivered && self.display_delivered
    }
}

/// Copies each reading into both consumer queues.
pub struct Fanout<'q> {
    control: &'q TelemetryQueue,
    display: &'q TelemetryQueue,
    timeout: Duration,
}

impl<'q> Fanout<'q> {
    pub fn new(control: &'q TelemetryQueue, display: &'q TelemetryQueue, timeout: Duration) -> Self {
        Self {
            control,
            display,
            timeout,
        }
    }

    /// Send a copy of `reading` to each consumer.  A full queue drops its
    /// copy (logged) without affecting the other queue.
    pub fn publish(&self, reading: Reading) -> FanoutReport {
        let display_delivered = match self.display.send_timeout(reading, self.timeout) {
            Ok(()) => true,
            Err(e) => {
                warn!("Sensor task: display queue {}, reading dropped", e);
                false
            }
        };
        let control_delivered = match self.control.send_timeout(reading, self.timeout) {
            Ok(()) => true,
            Err(e) => {
                warn!("Sensor task: control queue {}, reading dropped", e);
                false
            }
        };
        debug!(
            "Sensor task: published (control={}, display={})",
            control_delivered, display_delivered
        );
        FanoutReport {
            control_delivered,
            display_delivered,
        }
    }
}
