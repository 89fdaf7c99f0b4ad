#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: hbk_format::parse_toc, the table-of-contents parser.
//
// Catches bugs in:
// - the fixed TOC_BLOCK_OFFSET=16 header read
// - 12-byte record chunking on an arbitrary payload length
// - trailing-zeroed-record trimming
fuzz_target!(|data: &[u8]| {
    let _ = hbk_format::parse_toc(data);
});
