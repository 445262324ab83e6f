use super::MAX_BIT_WIDTH;
use crate::error::{Error, Result};
use std::io::Write;

/// Bit-level writer for the token stream
///
/// Writes bits MSB-first. Every completed byte goes to the sink immediately,
/// so callers writing to files should hand in a `BufWriter`.
pub struct BitWriter<W: Write> {
    writer: W,
    /// Current partial byte, right-aligned
    buffer: u32,
    /// Bits held in buffer (0-7 between calls)
    bits_in_buffer: u8,
    /// Complete bytes handed to the sink
    bytes_written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, buffer: 0, bits_in_buffer: 0, bytes_written: 0 }
    }

    /// Write the low `n` bits (1-16) of value in MSB-first order
    pub fn write_bits(&mut self, value: u16, n: u8) -> Result<()> {
        if n == 0 || n > MAX_BIT_WIDTH {
            return Err(Error::InvalidBitWidth(n));
        }

        self.buffer = (self.buffer << n) | (value as u32 & ((1u32 << n) - 1));
        self.bits_in_buffer += n;

        while self.bits_in_buffer >= 8 {
            let byte = (self.buffer >> (self.bits_in_buffer - 8)) as u8;
            self.writer.write_all(&[byte])?;
            self.bits_in_buffer -= 8;
            self.bytes_written += 1;
        }
        self.buffer &= (1u32 << self.bits_in_buffer) - 1;

        Ok(())
    }

    /// Write a single bit
    #[inline]
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.write_bits(bit as u16, 1)
    }

    /// Pad the partial byte with zero bits and emit it
    pub fn align_to_byte(&mut self) -> Result<()> {
        if self.bits_in_buffer > 0 {
            let byte = (self.buffer << (8 - self.bits_in_buffer)) as u8;
            self.writer.write_all(&[byte])?;
            self.buffer = 0;
            self.bits_in_buffer = 0;
            self.bytes_written += 1;
        }
        Ok(())
    }

    /// Pad, flush the sink and hand it back
    pub fn finish(mut self) -> Result<W> {
        self.align_to_byte()?;
        self.writer.flush()?;
        Ok(self.writer)
    }

    /// Output length in bytes (including partial byte)
    pub fn len(&self) -> u64 {
        self.bytes_written + if self.bits_in_buffer > 0 { 1 } else { 0 }
    }

    /// Check if nothing has been written
    pub fn is_empty(&self) -> bool {
        self.bytes_written == 0 && self.bits_in_buffer == 0
    }
}
