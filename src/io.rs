//! File-level helpers wrapping the streaming codecs.

use crate::error::{Error, Result};
use crate::source::InputSource;
use crate::{decompress, Codec, CodecConfig, CodecStats, Compressor, Decompressor};
use log::debug;
use std::fs::File;
use std::path::Path;

/// Compress the file at `input` into a new file at `output`
pub fn compress_file(input: &Path, output: &Path, config: &CodecConfig) -> Result<CodecStats> {
    let mut compressor = Compressor::new(config.clone())?;
    let source = InputSource::open(input)?;
    let sink = File::create(output)?;
    let stats = compressor.run(source.as_bytes(), sink)?;
    debug!("{} -> {}: ratio {:.3}", input.display(), output.display(), stats.ratio());
    Ok(stats)
}

/// Decompress the file at `input` into a new file at `output`
pub fn decompress_file(input: &Path, output: &Path, config: &CodecConfig) -> Result<CodecStats> {
    let source = InputSource::open(input)?;
    let sink = File::create(output)?;
    Decompressor::new(config.clone()).run(source.as_bytes(), sink)
}

/// Decompress `compressed` and check that it reproduces `original`
///
/// Returns the CRC32 shared by both on success.
pub fn verify_roundtrip(original: &[u8], compressed: &[u8]) -> Result<u32> {
    let expected = crc32fast::hash(original);
    let restored = decompress(compressed)?;
    let found = crc32fast::hash(&restored);

    if expected != found || restored.len() != original.len() {
        return Err(Error::ChecksumMismatch { expected, found });
    }
    debug!("round trip verified: {} bytes, crc32 {:08x}", original.len(), found);
    Ok(found)
}
