//! Serial console bridge for remote parameter writes.
//!
//! Reads newline-terminated commands of the form
//!
//! ```text
//! <device>.<param>=<value>        e.g.  Servo.Power=true
//! ```
//!
//! and hands them to a [`WriteRequestHandler`].  Device names may contain
//! spaces and dots; the *last* dot before `=` separates the parameter.
//! Values parse as `true`/`false`, then integer, then float.

use std::io::BufRead;

use log::{info, warn};

use crate::app::ports::{ParamValue, WriteRequestHandler};

/// Malformed console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleError {
    MissingValue,
    MissingParam,
    BadValue,
}

impl core::fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingValue => write!(f, "expected <device>.<param>=<value>"),
            Self::MissingParam => write!(f, "missing '.<param>'"),
            Self::BadValue => write!(f, "value is not bool, int or float"),
        }
    }
}

impl std::error::Error for ConsoleError {}

/// One parsed write request, borrowing from the input line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WriteLine<'a> {
    pub device: &'a str,
    pub param: &'a str,
    pub value: ParamValue,
}

pub fn parse_line(line: &str) -> Result<WriteLine<'_>, ConsoleError> {
    let (target, raw) = line.trim().split_once('=').ok_or(ConsoleError::MissingValue)?;
    let (device, param) = target.trim().rsplit_once('.').ok_or(ConsoleError::MissingParam)?;
    if device.is_empty() || param.is_empty() {
        return Err(ConsoleError::MissingParam);
    }
    Ok(WriteLine {
        device,
        param,
        value: parse_value(raw.trim())?,
    })
}

fn parse_value(raw: &str) -> Result<ParamValue, ConsoleError> {
    match raw {
        "true" | "on" => return Ok(ParamValue::Bool(true)),
        "false" | "off" => return Ok(ParamValue::Bool(false)),
        _ => {}
    }
    if let Ok(i) = raw.parse::<i32>() {
        return Ok(ParamValue::Int(i));
    }
    raw.parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .map(ParamValue::Float)
        .ok_or(ConsoleError::BadValue)
}

/// Feed every line of `input` to `handler` until EOF.
///
/// Blank lines and `#` comments are skipped; malformed lines and rejected
/// writes are logged and do not stop the loop.  Returns the number of
/// accepted writes.
pub fn run_console(input: impl BufRead, handler: &mut impl WriteRequestHandler) -> usize {
    let mut accepted = 0;
    for line in input.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!("Console: read error: {}", e);
                break;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match parse_line(trimmed) {
            Ok(w) => match handler.on_write(w.device, w.param, w.value) {
                Ok(()) => accepted += 1,
                Err(e) => warn!("Console: write {}.{} rejected: {}", w.device, w.param, e),
            },
            Err(e) => warn!("Console: '{}': {}", trimmed, e),
        }
    }
    info!("Console: input closed after {} writes", accepted);
    accepted
}
