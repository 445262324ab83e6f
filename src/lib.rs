//! Simplified LZ77 compression.
//!
//! Repeated byte sequences are replaced by back-references into a 4 KiB
//! sliding window. Candidates come from a path-compressed trie (or, as an
//! alternative backend, an exact-key hash table) that maps recent sequences
//! to the position where they last started. Tokens are bit-packed MSB-first:
//!
//! | Field | Width | Meaning |
//! |---|---|---|
//! | flag | 1 | 0 = literal, 1 = match |
//! | byte | 8 | literal byte (flag 0) |
//! | distance | 12 | 0 = previous byte (flag 1) |
//! | length | 4 | 2-15 (flag 1) |
//!
//! ```
//! let data = b"mahi mahi mahi mahi";
//! let packed = slz77::compress(data).unwrap();
//! assert_eq!(slz77::decompress(&packed).unwrap(), data);
//! ```

pub mod bits;
pub mod error;
pub mod io;
pub mod lz77;
pub mod matcher;
pub mod source;

pub use error::{Error, Result};
pub use lz77::tokens::Token;
pub use lz77::{Compressor, Decompressor, SlidingQueue};
pub use matcher::{HashMatcher, MatchFinder, MatchTrie};
pub use source::InputSource;

use lz77::tokens::{MAX_MATCH, MIN_MATCH, WINDOW_SIZE};
use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

/// Match index used by the compressor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MatcherKind {
    /// Path-compressed trie: one descent per lookup
    #[default]
    Trie,
    /// Exact-key hash table: one probe per candidate length
    Hash,
}

impl MatcherKind {
    /// Build an empty index sized for `config`
    pub fn build(&self, config: &CodecConfig) -> Box<dyn MatchFinder> {
        match self {
            Self::Trie => Box::new(MatchTrie::new()),
            Self::Hash => Box::new(HashMatcher::with_capacity(
                config.window_size * (config.lookahead - 1),
            )),
        }
    }
}

impl FromStr for MatcherKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trie" => Ok(Self::Trie),
            "hash" => Ok(Self::Hash),
            other => Err(format!("unknown matcher '{}' (expected 'trie' or 'hash')", other)),
        }
    }
}

impl fmt::Display for MatcherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Trie => "trie",
            Self::Hash => "hash",
        })
    }
}

/// Configuration for compression and decompression
#[derive(Clone, Debug)]
pub struct CodecConfig {
    /// Bytes kept referenceable by the compressor (max distance + 1, at most 4096)
    pub window_size: usize,
    /// Bytes looked ahead per step, which caps the match length (2-15)
    pub lookahead: usize,
    /// Match index backend
    pub matcher: MatcherKind,
    /// Buffer size for I/O operations
    pub buffer_size: usize,
}

impl CodecConfig {
    /// Check that the parameters fit the wire format
    pub fn validate(&self) -> Result<()> {
        if !(MIN_MATCH..=MAX_MATCH).contains(&self.lookahead) {
            return Err(Error::InvalidConfig(format!(
                "lookahead {} outside {}..={}",
                self.lookahead, MIN_MATCH, MAX_MATCH
            )));
        }
        if !(self.lookahead..=WINDOW_SIZE).contains(&self.window_size) {
            return Err(Error::InvalidConfig(format!(
                "window size {} outside {}..={}",
                self.window_size, self.lookahead, WINDOW_SIZE
            )));
        }
        if self.buffer_size == 0 {
            return Err(Error::InvalidConfig("buffer size must be non-zero".to_string()));
        }
        Ok(())
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            window_size: WINDOW_SIZE,
            lookahead: MAX_MATCH,
            matcher: MatcherKind::Trie,
            buffer_size: 64 * 1024,
        }
    }
}

/// Statistics from a compression or decompression run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodecStats {
    pub input_bytes: u64,
    pub output_bytes: u64,
    /// Literal tokens written or read
    pub literals: u64,
    /// Match tokens written or read
    pub matches: u64,
}

impl CodecStats {
    /// Output size relative to input size (0.0 for empty input)
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.output_bytes as f64 / self.input_bytes as f64
        }
    }
}

/// One direction of the codec, from a byte source to a byte sink
pub trait Codec {
    fn run<R: Read, W: Write>(&mut self, input: R, output: W) -> Result<CodecStats>;
}

/// Compress `data` in memory with the default configuration
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    compress_with(data, &CodecConfig::default())
}

/// Compress `data` in memory
pub fn compress_with(data: &[u8], config: &CodecConfig) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(data.len() / 2 + 16);
    Compressor::new(config.clone())?.run(data, &mut output)?;
    Ok(output)
}

/// Decompress a token stream in memory
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(data.len() * 2);
    Decompressor::default().run(data, &mut output)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(CodecConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let bad_lookahead = CodecConfig { lookahead: 16, ..Default::default() };
        assert!(matches!(bad_lookahead.validate(), Err(Error::InvalidConfig(_))));

        let bad_window = CodecConfig { window_size: 4097, ..Default::default() };
        assert!(matches!(bad_window.validate(), Err(Error::InvalidConfig(_))));

        let window_below_lookahead = CodecConfig { window_size: 8, ..Default::default() };
        assert!(window_below_lookahead.validate().is_err());

        let small = CodecConfig { window_size: 16, lookahead: 4, ..Default::default() };
        assert!(small.validate().is_ok());
    }

    #[test]
    fn test_matcher_kind_parse() {
        assert_eq!("trie".parse::<MatcherKind>().unwrap(), MatcherKind::Trie);
        assert_eq!("HASH".parse::<MatcherKind>().unwrap(), MatcherKind::Hash);
        assert!("btree".parse::<MatcherKind>().is_err());
        assert_eq!(MatcherKind::Hash.to_string(), "hash");
    }

    #[test]
    fn test_stats_ratio() {
        let stats = CodecStats { input_bytes: 200, output_bytes: 50, ..Default::default() };
        assert!((stats.ratio() - 0.25).abs() < f64::EPSILON);
        assert_eq!(CodecStats::default().ratio(), 0.0);
    }

    #[test]
    fn test_roundtrip_in_memory() {
        let data = b"The quick brown fox jumps over the lazy dog. The quick brown fox!";
        let packed = compress(data).unwrap();
        assert!(packed.len() < data.len());
        assert_eq!(decompress(&packed).unwrap(), data);
    }
}
