//! AquaSense water-quality monitor library.
//!
//! Exposes the pipeline stages, ports and adapters for integration testing
//! and for the firmware binary. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod pins;
pub mod telemetry;

pub mod adapters;
pub mod drivers;
pub mod sensors;
pub mod tasks;

mod esp_link_shims;
