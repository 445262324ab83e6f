use crate::error::{Error, Result};

/// Fixed-capacity circular byte buffer
///
/// Pushing onto a full queue overwrites the oldest byte. All offsets are
/// relative to the oldest byte still held.
#[derive(Clone, Debug)]
pub struct SlidingQueue {
    buffer: Box<[u8]>,
    /// Position of the oldest byte
    head: usize,
    /// Number of bytes held (0..=capacity)
    len: usize,
}

impl SlidingQueue {
    /// Create an empty queue holding at most `capacity` bytes
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "SlidingQueue capacity must be greater than 0");
        Self { buffer: vec![0u8; capacity].into_boxed_slice(), head: 0, len: 0 }
    }

    /// Append a byte, evicting the oldest one if the queue is full
    #[inline]
    pub fn push(&mut self, byte: u8) {
        let tail = self.physical(self.len % self.capacity());
        self.buffer[tail] = byte;
        if self.len < self.capacity() {
            self.len += 1;
        } else {
            self.head = self.physical(1);
        }
    }

    /// Remove and return the oldest byte
    pub fn pop_front(&mut self) -> Result<u8> {
        if self.len == 0 {
            return Err(Error::Empty);
        }
        let byte = self.buffer[self.head];
        self.head = self.physical(1);
        self.len -= 1;
        Ok(byte)
    }

    /// Byte at `offset` from the oldest one
    #[inline]
    pub fn get(&self, offset: usize) -> Result<u8> {
        if offset >= self.len {
            return Err(Error::OutOfRange { offset, len: 1, available: self.len });
        }
        Ok(self.buffer[self.physical(offset)])
    }

    /// Copy of `len` bytes starting `offset` bytes after the oldest one
    pub fn sub_range(&self, offset: usize, len: usize) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(len);
        self.copy_range_to(offset, len, &mut out)?;
        Ok(out)
    }

    /// Append `len` bytes starting at `offset` to `out`
    ///
    /// Lets hot loops reuse one allocation instead of calling [`sub_range`](Self::sub_range).
    pub fn copy_range_to(&self, offset: usize, len: usize, out: &mut Vec<u8>) -> Result<()> {
        match offset.checked_add(len) {
            Some(end) if end <= self.len => {}
            _ => return Err(Error::OutOfRange { offset, len, available: self.len }),
        }

        let start = self.physical(offset);
        let first = len.min(self.capacity() - start);
        out.extend_from_slice(&self.buffer[start..start + first]);
        out.extend_from_slice(&self.buffer[..len - first]);
        Ok(())
    }

    /// Number of bytes held
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Drop all bytes, keeping the allocation
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    #[inline]
    fn physical(&self, offset: usize) -> usize {
        (self.head + offset) % self.capacity()
    }
}
