#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: hbk_format::read_block header parsing.
//
// Catches bugs in:
// - CRLF/space framing validation
// - ASCII-hex field decoding
// - payload_size vs block_size bounds checking
// - truncated buffers
fuzz_target!(|data: &[u8]| {
    let _ = hbk_format::read_block(data, 0);
});
