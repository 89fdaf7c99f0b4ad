#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: hbk_zip::ZipEntries local-file-header iteration, plus
// decompress on every entry it yields.
//
// Catches bugs in:
// - local-file-header field decoding (name/extra lengths, sizes)
// - clean termination on a non-signature word
// - DEFLATE decompression of attacker-controlled compressed bytes
// - stored-method passthrough
fuzz_target!(|data: &[u8]| {
    for entry in hbk_zip::ZipEntries::new(data) {
        let _ = hbk_zip::decompress(&entry);
    }
});
