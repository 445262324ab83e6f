use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Bit stream errors
    #[error("End of stream: not enough bits left in input")]
    EndOfStream,

    #[error("Unsupported bit width: {0} (1-16 supported)")]
    InvalidBitWidth(u8),

    // Token stream errors
    #[error("Truncated stream: input ended inside the {field} field of a match token")]
    Truncated { field: &'static str },

    #[error("Invalid match length: {0} (valid range 2-15)")]
    InvalidMatchLength(u8),

    #[error("Back-reference distance {distance} exceeds available window {available}")]
    InvalidBackReference { distance: u16, available: usize },

    // Sliding queue errors
    #[error("Queue access out of range: offset {offset} + length {len} exceeds {available} buffered bytes")]
    OutOfRange { offset: usize, len: usize, available: usize },

    #[error("Pop from an empty queue")]
    Empty,

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Verification errors
    #[error("CRC32 mismatch after round trip: expected 0x{expected:08x}, got 0x{found:08x}")]
    ChecksumMismatch { expected: u32, found: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;
