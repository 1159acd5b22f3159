#![no_main]

use libfuzzer_sys::fuzz_target;
use mesh_weld_fuzz::Geometry;

fuzz_target!(|value: Geometry| {
    value.check();
});
