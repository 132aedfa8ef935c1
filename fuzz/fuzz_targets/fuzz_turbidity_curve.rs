//! Fuzz target: `ntu_from_voltage`
//!
//! Any 32-bit pattern interpreted as a voltage must map onto the turbidity
//! scale or, for NaN input, be caught by `Reading::sanitized`.
//!
//! cargo fuzz run fuzz_turbidity_curve

#![no_main]

use aquasense::app::model::{Reading, TURBIDITY_MAX_NTU};
use aquasense::sensors::turbidity::ntu_from_voltage;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: [u8; 4]| {
    let v = f32::from_le_bytes(data);
    let ntu = ntu_from_voltage(v);
    if v.is_finite() {
        assert!((0.0..=TURBIDITY_MAX_NTU).contains(&ntu), "v={v} ntu={ntu}");
    }

    let r = Reading { turbidity_ntu: ntu, ..Reading::ZERO }.sanitized(&Reading::ZERO);
    assert!(r.turbidity_ntu.is_finite());
    assert!((0.0..=TURBIDITY_MAX_NTU).contains(&r.turbidity_ntu));
});
