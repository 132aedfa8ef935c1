//! Fuzz target: `parse_line`
//!
//! Arbitrary console input must never panic the parser, and every parsed
//! write must borrow non-empty device and parameter names.
//!
//! cargo fuzz run fuzz_console_line

#![no_main]

use aquasense::adapters::console::parse_line;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(w) = parse_line(line) {
        assert!(!w.device.is_empty());
        assert!(!w.param.is_empty());
    }
});
