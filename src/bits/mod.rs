pub mod reader;
pub mod writer;

pub use reader::BitReader;
pub use writer::BitWriter;

/// Widest field a single `read_bits`/`write_bits` call accepts
pub const MAX_BIT_WIDTH: u8 = 16;
