use super::queue::SlidingQueue;
use super::tokens::{Token, MAX_MATCH, WINDOW_SIZE};
use super::PROGRESS_INTERVAL;
use crate::bits::BitReader;
use crate::error::{Error, Result};
use crate::{Codec, CodecConfig, CodecStats};
use log::{debug, trace, warn};
use std::io::{BufReader, BufWriter, Read, Write};

/// Streaming decompressor
///
/// Keeps the last 4096 output bytes so every distance the format can express
/// resolves, whatever window the stream was compressed with.
#[derive(Default)]
pub struct Decompressor {
    config: CodecConfig,
}

impl Decompressor {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }
}

impl Codec for Decompressor {
    fn run<R: Read, W: Write>(&mut self, input: R, output: W) -> Result<CodecStats> {
        let mut bits = BitReader::new(BufReader::with_capacity(self.config.buffer_size, input));
        let mut writer = BufWriter::with_capacity(self.config.buffer_size, output);
        let mut history = SlidingQueue::new(WINDOW_SIZE);
        let mut scratch = Vec::with_capacity(MAX_MATCH);
        let mut stats = CodecStats::default();
        let mut next_progress = PROGRESS_INTERVAL;

        while let Some(token) = Token::read_from(&mut bits)? {
            match token {
                Token::Literal(byte) => {
                    history.push(byte);
                    writer.write_all(&[byte])?;
                    stats.literals += 1;
                }
                Token::Match { distance, length } => {
                    replay(&mut history, distance, length, &mut scratch)?;
                    writer.write_all(&scratch)?;
                    stats.matches += 1;
                }
            }
            stats.output_bytes += token.uncompressed_size() as u64;

            if stats.output_bytes >= next_progress {
                trace!("decompressed {} bytes", stats.output_bytes);
                next_progress += PROGRESS_INTERVAL;
            }
        }

        let (padding, _) = bits.buffered();
        if padding != 0 {
            warn!("trailing padding bits are not zero: {:#b}", padding);
        }

        writer.flush()?;
        stats.input_bytes = bits.bytes_read();

        debug!(
            "decompressed {} -> {} bytes ({} literals, {} matches)",
            stats.input_bytes, stats.output_bytes, stats.literals, stats.matches
        );
        Ok(stats)
    }
}

/// Copy `length` bytes starting `distance + 1` bytes back into `history`,
/// leaving the produced bytes in `out`
///
/// A match may overlap the bytes it produces (`length > distance + 1`), in
/// which case it is replayed one byte at a time.
fn replay(
    history: &mut SlidingQueue,
    distance: u16,
    length: u8,
    out: &mut Vec<u8>,
) -> Result<()> {
    let back = distance as usize;
    let start = history
        .len()
        .checked_sub(back + 1)
        .ok_or(Error::InvalidBackReference { distance, available: history.len() })?;

    out.clear();
    if length as usize > back + 1 {
        for _ in 0..length {
            let byte = history.get(history.len() - 1 - back)?;
            history.push(byte);
            out.push(byte);
        }
    } else {
        history.copy_range_to(start, length as usize, out)?;
        for &byte in out.iter() {
            history.push(byte);
        }
    }
    Ok(())
}
