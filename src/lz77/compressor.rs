use super::queue::SlidingQueue;
use super::tokens::{Token, MAX_DISTANCE, MIN_MATCH};
use super::PROGRESS_INTERVAL;
use crate::bits::BitWriter;
use crate::error::Result;
use crate::matcher::MatchFinder;
use crate::{Codec, CodecConfig, CodecStats};
use log::{debug, trace};
use std::io::{BufReader, BufWriter, Read, Write};

/// Streaming compressor
///
/// Bytes flow through a lookahead queue. Each time it fills, the oldest byte
/// is finalized: either covered by a match token, emitted as a literal, or
/// skipped because an earlier match already covers it.
pub struct Compressor {
    config: CodecConfig,
}

impl Compressor {
    pub fn new(config: CodecConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }
}

impl Codec for Compressor {
    fn run<R: Read, W: Write>(&mut self, input: R, output: W) -> Result<CodecStats> {
        let reader = BufReader::with_capacity(self.config.buffer_size, input);
        let writer = BufWriter::with_capacity(self.config.buffer_size, output);

        debug!(
            "compressing: window={} lookahead={} matcher={}",
            self.config.window_size, self.config.lookahead, self.config.matcher
        );

        let mut engine = CompressEngine::new(&self.config, BitWriter::new(writer));
        for byte in reader.bytes() {
            engine.feed(byte?)?;
        }
        let (_, stats) = engine.finish()?;

        debug!(
            "compressed {} -> {} bytes ({} literals, {} matches)",
            stats.input_bytes, stats.output_bytes, stats.literals, stats.matches
        );
        Ok(stats)
    }
}

/// State of one compression run
pub(crate) struct CompressEngine<W: Write> {
    bits: BitWriter<W>,
    matcher: Box<dyn MatchFinder>,
    /// Bytes read but not finalized yet
    pending: SlidingQueue,
    /// Most recently finalized bytes, used to find entries that aged out
    window: SlidingQueue,
    /// Scratch buffer for keys taken from the queues
    key: Vec<u8>,
    /// Bytes finalized so far; the coordinate space of stored positions
    compressed: u64,
    /// Finalized bytes still covered by the last match token
    skip: usize,
    stats: CodecStats,
}

impl<W: Write> CompressEngine<W> {
    pub(crate) fn new(config: &CodecConfig, bits: BitWriter<W>) -> Self {
        Self {
            bits,
            matcher: config.matcher.build(config),
            pending: SlidingQueue::new(config.lookahead),
            window: SlidingQueue::new(config.window_size),
            key: Vec::with_capacity(config.lookahead),
            compressed: 0,
            skip: 0,
            stats: CodecStats::default(),
        }
    }

    /// Accept one input byte, finalizing the oldest pending byte once the
    /// lookahead is full
    pub(crate) fn feed(&mut self, byte: u8) -> Result<()> {
        self.pending.push(byte);
        self.stats.input_bytes += 1;
        if self.pending.is_full() {
            self.step()?;
        }
        Ok(())
    }

    /// Drain the lookahead and close the bit stream
    pub(crate) fn finish(mut self) -> Result<(W, CodecStats)> {
        while !self.pending.is_empty() {
            self.step()?;
        }
        self.stats.output_bytes = self.bits.len();
        let writer = self.bits.finish()?;
        trace!("match index holds {} keys at end of input", self.matcher.len());
        Ok((writer, self.stats))
    }

    /// Finalize the oldest pending byte
    fn step(&mut self) -> Result<()> {
        self.key.clear();
        self.pending.copy_range_to(0, self.pending.len(), &mut self.key)?;

        // Look up before inserting so a sequence never matches itself
        let candidate = self.matcher.longest_match(&self.key);
        let anchor = self.compressed + 1;
        for len in MIN_MATCH..=self.key.len() {
            self.matcher.insert(&self.key[..len], anchor);
        }

        let byte = self.pending.pop_front()?;
        if self.skip > 0 {
            self.skip -= 1;
        } else {
            let token = self.choose_token(byte, candidate);
            token.write_to(&mut self.bits)?;
            match token {
                Token::Literal(_) => self.stats.literals += 1,
                Token::Match { length, .. } => {
                    self.stats.matches += 1;
                    self.skip = length as usize - 1;
                }
            }
        }
        self.compressed += 1;

        if self.window.is_full() {
            self.evict_oldest()?;
        }
        self.window.push(byte);

        if self.compressed % PROGRESS_INTERVAL == 0 {
            trace!("compressed {} bytes, {} keys indexed", self.compressed, self.matcher.len());
        }
        Ok(())
    }

    /// Match token for `candidate` if it is representable, otherwise a literal
    fn choose_token(&self, byte: u8, candidate: Option<(usize, u64)>) -> Token {
        match candidate {
            Some((length, anchor))
                if length >= MIN_MATCH
                    && anchor <= self.compressed
                    && self.compressed - anchor <= MAX_DISTANCE as u64 =>
            {
                Token::Match { distance: (self.compressed - anchor) as u16, length: length as u8 }
            }
            _ => Token::Literal(byte),
        }
    }

    /// Drop index entries anchored at the oldest window byte once they can
    /// no longer be reached by a distance that fits the window
    fn evict_oldest(&mut self) -> Result<()> {
        let threshold = self.compressed.saturating_sub(self.window.capacity() as u64);
        let len = self.pending.capacity().min(self.window.len());

        self.key.clear();
        self.window.copy_range_to(0, len, &mut self.key)?;
        for len in MIN_MATCH..=self.key.len() {
            self.matcher.evict_if(&self.key[..len], &|position| position <= threshold);
        }
        Ok(())
    }

    #[cfg(test)]
    fn matcher(&self) -> &dyn MatchFinder {
        self.matcher.as_ref()
    }
}
