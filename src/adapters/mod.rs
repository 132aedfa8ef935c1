//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements          | Connects to                 |
//! |----------------|---------------------|-----------------------------|
//! | `adc`          | AdcPort             | ESP32 ADC1 oneshot / sim    |
//! | `hardware`     | ActuatorPort        | LEDC servo, drain/alarm GPIO|
//! | `log_reporter` | ReporterPort        | Serial log output           |
//! | `log_display`  | DisplayPort         | OLED row buffer + log       |
//! | `time`         | ClockPort           | ESP32 system timer          |
//! | `console`      | (drives) WriteRequestHandler | stdin / UART lines |

pub mod adc;
pub mod console;
pub mod hardware;
pub mod log_display;
pub mod log_reporter;
pub mod time;
