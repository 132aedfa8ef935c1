//! Actuator drivers, hardware initialisation, and task spawning.

pub mod gpio_out;
pub mod hw_init;
pub mod servo;
pub mod task_pin;
