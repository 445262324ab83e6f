//! End-to-end integration tests for slz77.
//!
//! Round trips through the in-memory API, the file helpers and the binary.

use std::fs;
use std::process::Command;

use slz77::io::{compress_file, decompress_file, verify_roundtrip};
use slz77::{
    compress, compress_with, decompress, Codec, CodecConfig, Compressor, Decompressor, Error,
    MatcherKind, Token,
};
use tempfile::tempdir;

// ============================================================================
// Test Data Generators
// ============================================================================

/// Generate random data using a simple PRNG
fn generate_random_data(size: usize, seed: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut state = seed;
    for _ in 0..size {
        // Simple xorshift PRNG
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        data.push((state & 0xFF) as u8);
    }
    data
}

/// Generate data with mixed patterns (moderate compression)
fn generate_mixed_data(size: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let patterns = [
        b"ACGTACGTACGTACGT".as_slice(),
        b"NNNNNNNNNNNNNNNN".as_slice(),
        b"the rain in spain falls mainly".as_slice(),
    ];

    let mut pattern_idx = 0;
    while data.len() < size {
        let pattern = patterns[pattern_idx % patterns.len()];
        let remaining = size - data.len();
        let chunk_size = remaining.min(pattern.len());
        data.extend_from_slice(&pattern[..chunk_size]);
        pattern_idx += 1;
    }
    data
}

/// Text whose repeats sit further apart than the window
fn generate_far_repeats() -> Vec<u8> {
    let block = generate_random_data(5000, 0xfeed);
    let mut data = block.clone();
    data.extend_from_slice(b"separator");
    data.extend_from_slice(&block);
    data
}

fn assert_roundtrip(data: &[u8], config: &CodecConfig) {
    let packed = compress_with(data, config).unwrap();
    let restored = decompress(&packed).unwrap();
    assert_eq!(restored.len(), data.len(), "length mismatch for {:?}", config);
    assert!(restored == data, "content mismatch for {:?}", config);
}

fn configs() -> Vec<CodecConfig> {
    vec![
        CodecConfig::default(),
        CodecConfig { matcher: MatcherKind::Hash, ..Default::default() },
        CodecConfig { window_size: 64, lookahead: 8, ..Default::default() },
        CodecConfig { window_size: 15, lookahead: 15, matcher: MatcherKind::Hash, ..Default::default() },
    ]
}

// ============================================================================
// In-memory round trips
// ============================================================================

#[test]
fn test_roundtrip_empty() {
    assert!(compress(b"").unwrap().is_empty());
    assert!(decompress(b"").unwrap().is_empty());
}

#[test]
fn test_roundtrip_single_byte() {
    for config in configs() {
        assert_roundtrip(b"q", &config);
    }
}

#[test]
fn test_roundtrip_long_run() {
    let data = vec![b'a'; 5000];
    let packed = compress(&data).unwrap();
    // 1 literal and 334 full-length matches at most
    assert!(packed.len() < 800, "run compressed to {} bytes", packed.len());
    assert_eq!(decompress(&packed).unwrap(), data);
}

#[test]
fn test_roundtrip_alternating() {
    for config in configs() {
        assert_roundtrip(b"ababababab", &config);
    }
}

#[test]
fn test_roundtrip_random() {
    for (i, config) in configs().iter().enumerate() {
        assert_roundtrip(&generate_random_data(20_000, 42 + i as u64), config);
    }
}

#[test]
fn test_roundtrip_mixed() {
    let data = generate_mixed_data(100_000);
    for config in configs() {
        assert_roundtrip(&data, &config);
    }
    let packed = compress(&data).unwrap();
    assert!(packed.len() < data.len() / 3);
}

#[test]
fn test_roundtrip_repeats_beyond_window() {
    for config in configs() {
        assert_roundtrip(&generate_far_repeats(), &config);
    }
}

#[test]
fn test_roundtrip_all_byte_values() {
    let data: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
    for config in configs() {
        assert_roundtrip(&data, &config);
    }
}

#[test]
fn test_backends_emit_identical_bytes() {
    let data = generate_mixed_data(30_000);
    let mut noisy = generate_random_data(30_000, 7);
    for (i, byte) in data.iter().enumerate().step_by(3) {
        noisy[i] = *byte;
    }

    for input in [data, noisy] {
        let trie = compress_with(&input, &CodecConfig::default()).unwrap();
        let hash =
            compress_with(&input, &CodecConfig { matcher: MatcherKind::Hash, ..Default::default() })
                .unwrap();
        assert_eq!(trie, hash);
    }
}

#[test]
fn test_stats_match_token_stream() {
    let data = generate_mixed_data(10_000);
    let mut packed = Vec::new();
    let compress_stats = Compressor::new(CodecConfig::default())
        .unwrap()
        .run(data.as_slice(), &mut packed)
        .unwrap();

    let mut restored = Vec::new();
    let decompress_stats = Decompressor::default().run(packed.as_slice(), &mut restored).unwrap();

    assert_eq!(compress_stats.input_bytes, data.len() as u64);
    assert_eq!(compress_stats.output_bytes, packed.len() as u64);
    assert_eq!(decompress_stats.input_bytes, packed.len() as u64);
    assert_eq!(decompress_stats.output_bytes, data.len() as u64);
    assert_eq!(compress_stats.literals, decompress_stats.literals);
    assert_eq!(compress_stats.matches, decompress_stats.matches);

    let bits = compress_stats.literals * Token::Literal(0).encoded_bits() as u64
        + compress_stats.matches * Token::Match { distance: 0, length: 2 }.encoded_bits() as u64;
    assert_eq!(packed.len() as u64, bits.div_ceil(8));
}

#[test]
fn test_corrupt_stream_reports_error() {
    // A match as the very first token has nothing to copy from
    let corrupt = [0b1000_0000, 0b0000_0001, 0b0000_0000];
    assert!(matches!(decompress(&corrupt), Err(Error::InvalidBackReference { .. })));

    let packed = compress(&generate_mixed_data(1000)).unwrap();
    let mut truncated = packed.clone();
    truncated.truncate(packed.len() / 2);
    // Cutting a stream either ends on a token boundary or inside a match
    match decompress(&truncated) {
        Ok(prefix) => assert!(prefix.len() < 1000),
        Err(e) => assert!(matches!(e, Error::Truncated { .. })),
    }
}

// ============================================================================
// File helpers
// ============================================================================

#[test]
fn test_file_helpers_roundtrip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.bin");
    let packed = dir.path().join("input.slz");
    let output = dir.path().join("output.bin");

    let data = generate_mixed_data(200_000);
    fs::write(&input, &data).unwrap();

    for config in configs() {
        compress_file(&input, &packed, &config).unwrap();
        decompress_file(&packed, &output, &config).unwrap();
        assert!(fs::read(&output).unwrap() == data);
        verify_roundtrip(&data, &fs::read(&packed).unwrap()).unwrap();
    }
}

#[test]
fn test_file_helpers_missing_input() {
    let dir = tempdir().unwrap();
    let err = compress_file(
        &dir.path().join("missing"),
        &dir.path().join("out"),
        &CodecConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

// ============================================================================
// CLI
// ============================================================================

fn bin() -> String {
    env!("CARGO_BIN_EXE_slz77").to_string()
}

#[test]
fn test_cli_roundtrip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.txt");
    let packed = dir.path().join("input.slz");
    let output = dir.path().join("output.txt");

    let data = generate_mixed_data(50_000);
    fs::write(&input, &data).unwrap();

    let status = Command::new(bin()).arg("-c").arg(&input).arg(&packed).status().unwrap();
    assert!(status.success());
    assert!(fs::metadata(&packed).unwrap().len() < data.len() as u64);

    let status = Command::new(bin()).arg("-d").arg(&packed).arg(&output).status().unwrap();
    assert!(status.success());
    assert!(fs::read(&output).unwrap() == data);
}

#[test]
fn test_cli_options() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.txt");
    let packed = dir.path().join("input.slz");
    fs::write(&input, generate_mixed_data(20_000)).unwrap();

    let output = Command::new(bin())
        .args(["--compress", "--matcher", "hash", "--window-size", "1024", "--verify", "-v"])
        .arg(&input)
        .arg(&packed)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Verified round trip"), "stderr: {}", stderr);
    assert!(stderr.contains("Compression complete"), "stderr: {}", stderr);
}

#[test]
fn test_cli_usage_errors() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.txt");
    let out = dir.path().join("out");
    fs::write(&input, b"data").unwrap();

    // No mode
    let status = Command::new(bin()).arg(&input).arg(&out).status().unwrap();
    assert!(!status.success());

    // Both modes
    let status = Command::new(bin()).args(["-c", "-d"]).arg(&input).arg(&out).status().unwrap();
    assert!(!status.success());

    // Missing output path
    let status = Command::new(bin()).arg("-c").arg(&input).status().unwrap();
    assert!(!status.success());

    // Window out of range
    let status = Command::new(bin())
        .args(["-c", "--window-size", "5000"])
        .arg(&input)
        .arg(&out)
        .status()
        .unwrap();
    assert!(!status.success());
}

#[test]
fn test_cli_missing_input() {
    let dir = tempdir().unwrap();
    let output = Command::new(bin())
        .arg("-c")
        .arg(dir.path().join("does-not-exist"))
        .arg(dir.path().join("out"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("Error:"));
}
