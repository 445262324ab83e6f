#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes are mostly invalid streams; errors are fine, panics are not
    if let Ok(output) = slz77::decompress(data) {
        // Every token expands to at most 15 bytes from at least 9 bits
        assert!(output.len() <= data.len() * 8 / 9 * 15 + 15);
    }
});
