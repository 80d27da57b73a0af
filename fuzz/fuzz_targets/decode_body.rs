#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must only ever produce a typed error, never a
    // panic or an out-of-bounds write.
    let _ = astro_pack::Body::from_slice(data);
});
