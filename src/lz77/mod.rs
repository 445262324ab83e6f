pub mod compressor;
pub mod decompressor;
pub mod queue;
pub mod tokens;

pub use compressor::Compressor;
pub use decompressor::Decompressor;
pub use queue::SlidingQueue;
pub use tokens::Token;

/// Bytes between progress log lines
pub(crate) const PROGRESS_INTERVAL: u64 = 64 * 1024;
