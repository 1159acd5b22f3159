#![no_main]

use libfuzzer_sys::fuzz_target;
use mesh_weld_fuzz::Geometry;

fuzz_target!(|input: (Geometry, Vec<u32>)| {
    let (mut value, groups) = input;

    // Cycle the groups so every face gets one; few distinct values make
    // overlapping masks likely.
    if !groups.is_empty() {
        value.smoothing_groups = (0..value.faces.len())
            .map(|face| groups[face % groups.len()] & 0b1111)
            .collect();
    }

    value.check();
});
