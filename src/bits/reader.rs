use super::MAX_BIT_WIDTH;
use crate::error::{Error, Result};
use std::io::Read;

/// Bit-level reader for the token stream
///
/// Bits are consumed MSB-first within each byte. A failed read never
/// consumes anything: bytes pulled from the source stay buffered, so the
/// caller observes the same position as before the call.
pub struct BitReader<R: Read> {
    reader: R,
    /// Buffered bits, right-aligned; the next bit is bit `bits_available - 1`
    buffer: u32,
    /// Number of valid bits in buffer (0-23)
    bits_available: u8,
    /// Total bytes pulled from the source
    bytes_read: u64,
}

impl<R: Read> BitReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, buffer: 0, bits_available: 0, bytes_read: 0 }
    }

    /// Ensure at least `n` bits are buffered, pulling whole bytes from the source
    fn fill_buffer(&mut self, n: u8) -> Result<()> {
        while self.bits_available < n {
            let mut byte = [0u8; 1];
            match self.reader.read(&mut byte) {
                Ok(0) => return Err(Error::EndOfStream),
                Ok(_) => {
                    self.buffer = (self.buffer << 8) | byte[0] as u32;
                    self.bits_available += 8;
                    self.bytes_read += 1;
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => return Err(Error::Io(e)),
            }
        }
        Ok(())
    }

    /// Read `n` bits (1-16) in MSB-first order
    ///
    /// Returns [`Error::EndOfStream`] if fewer than `n` bits remain.
    pub fn read_bits(&mut self, n: u8) -> Result<u16> {
        if n == 0 || n > MAX_BIT_WIDTH {
            return Err(Error::InvalidBitWidth(n));
        }

        self.fill_buffer(n)?;

        let shift = self.bits_available - n;
        let value = (self.buffer >> shift) & low_mask(n);
        self.bits_available = shift;
        self.buffer &= low_mask(shift);

        Ok(value as u16)
    }

    /// Read a single bit
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? != 0)
    }

    /// Read an 8-bit value, not necessarily byte-aligned
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_bits(8).map(|v| v as u8)
    }

    /// Bits pulled from the source but not consumed yet, as `(value, count)`
    pub fn buffered(&self) -> (u32, u8) {
        (self.buffer, self.bits_available)
    }

    /// Total bytes pulled from the source
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Get the inner reader (consumes self)
    pub fn into_inner(self) -> R {
        self.reader
    }
}

#[inline]
fn low_mask(n: u8) -> u32 {
    (1u32 << n) - 1
}
