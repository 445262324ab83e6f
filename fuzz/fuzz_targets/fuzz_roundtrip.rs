#![no_main]

use libfuzzer_sys::fuzz_target;
use slz77::{compress_with, decompress, CodecConfig, MatcherKind};

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // First byte picks the configuration, the rest is the payload
    let lookahead = 2 + (data[0] & 0x0f) as usize % 14;
    let config = CodecConfig {
        window_size: lookahead.max(15) + (data[0] as usize) * 16,
        lookahead,
        matcher: if data[0] & 0x80 == 0 { MatcherKind::Trie } else { MatcherKind::Hash },
        ..Default::default()
    };
    let payload = &data[1..];

    let packed = compress_with(payload, &config).expect("valid config");
    let restored = decompress(&packed).expect("own output decodes");
    assert_eq!(restored, payload);
});
