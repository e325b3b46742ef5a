#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    nodepatch_fuzz::fuzz_render(data);
});
