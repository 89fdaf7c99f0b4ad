#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: hbk_format::read_entity_full block-chain traversal.
//
// Catches bugs in:
// - cycle detection across chained blocks
// - the 1 GiB concatenation bound
// - the NO_NEXT sentinel vs a raw offset
// - out-of-bounds next_raw values
fuzz_target!(|data: &[u8]| {
    let _ = hbk_format::read_entity_full(data, 0);
});
