use crate::bits::{BitReader, BitWriter};
use crate::error::{Error, Result};
use std::io::{Read, Write};

/// Width of the literal/match flag
pub const FLAG_BITS: u8 = 1;
/// Width of a literal byte
pub const LITERAL_BITS: u8 = 8;
/// Width of a match distance
pub const DISTANCE_BITS: u8 = 12;
/// Width of a match length
pub const LENGTH_BITS: u8 = 4;

/// Largest distance a match token can carry (0 = previous byte)
pub const MAX_DISTANCE: u16 = (1 << DISTANCE_BITS) - 1;
/// Shortest run worth a match token
pub const MIN_MATCH: usize = 2;
/// Longest run a match token can carry
pub const MAX_MATCH: usize = (1 << LENGTH_BITS) - 1;
/// Bytes a decoder must keep to resolve any distance
pub const WINDOW_SIZE: usize = MAX_DISTANCE as usize + 1;

/// Represents a single token in the compressed stream
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    /// A literal byte
    Literal(u8),
    /// A back-reference: copy `length` bytes starting `distance + 1` bytes back
    Match { distance: u16, length: u8 },
}

impl Token {
    /// Returns the uncompressed size this token represents
    pub fn uncompressed_size(&self) -> usize {
        match self {
            Token::Literal(_) => 1,
            Token::Match { length, .. } => *length as usize,
        }
    }

    /// Size of this token on the wire
    pub fn encoded_bits(&self) -> u32 {
        match self {
            Token::Literal(_) => (FLAG_BITS + LITERAL_BITS) as u32,
            Token::Match { .. } => (FLAG_BITS + DISTANCE_BITS + LENGTH_BITS) as u32,
        }
    }

    /// Serialise the token: flag bit, then byte or distance + length
    pub fn write_to<W: Write>(&self, bits: &mut BitWriter<W>) -> Result<()> {
        match *self {
            Token::Literal(byte) => {
                bits.write_bit(false)?;
                bits.write_bits(byte as u16, LITERAL_BITS)
            }
            Token::Match { distance, length } => {
                debug_assert!(distance <= MAX_DISTANCE);
                debug_assert!((MIN_MATCH..=MAX_MATCH).contains(&(length as usize)));
                bits.write_bit(true)?;
                bits.write_bits(distance, DISTANCE_BITS)?;
                bits.write_bits(length as u16, LENGTH_BITS)
            }
        }
    }

    /// Read the next token
    ///
    /// Returns `None` at the end of the stream: either no flag bit is left, or
    /// a literal flag sits in the zero padding of the final byte. Running out
    /// of bits inside a match is a truncated stream.
    pub fn read_from<R: Read>(bits: &mut BitReader<R>) -> Result<Option<Token>> {
        let is_match = match bits.read_bit() {
            Ok(flag) => flag,
            Err(Error::EndOfStream) => return Ok(None),
            Err(e) => return Err(e),
        };

        if !is_match {
            return match bits.read_u8() {
                Ok(byte) => Ok(Some(Token::Literal(byte))),
                Err(Error::EndOfStream) => Ok(None),
                Err(e) => Err(e),
            };
        }

        let distance = bits.read_bits(DISTANCE_BITS).map_err(|e| truncated(e, "distance"))?;
        let length = bits.read_bits(LENGTH_BITS).map_err(|e| truncated(e, "length"))? as u8;
        if (length as usize) < MIN_MATCH {
            return Err(Error::InvalidMatchLength(length));
        }

        Ok(Some(Token::Match { distance, length }))
    }
}

fn truncated(err: Error, field: &'static str) -> Error {
    match err {
        Error::EndOfStream => Error::Truncated { field },
        other => other,
    }
}
