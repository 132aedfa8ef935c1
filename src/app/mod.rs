//! Application core: pure pipeline logic, zero I/O.
//!
//! The change-gated reporting, the pH alert latch and the display redraw
//! rules live here. All interaction with hardware and the remote
//! device-management layer happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod control;
pub mod display;
pub mod model;
pub mod ports;
