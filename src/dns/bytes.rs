//! Big-endian integer and bit primitives over a datagram.

use crate::error::{Error, Result};

/// A read position inside a complete datagram.
///
/// The cursor keeps the whole buffer rather than the unread tail so that
/// compression pointers, which are absolute offsets, can re-seek into it.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// A fresh cursor over the same datagram, positioned at `offset`.
    pub fn at(&self, offset: usize) -> Result<Self> {
        if offset >= self.buf.len() {
            return Err(Error::Truncated {
                offset,
                needed: 1,
                len: self.buf.len(),
            });
        }
        Ok(Self {
            buf: self.buf,
            pos: offset,
        })
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Consume `n` raw bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(Error::Truncated {
                offset: self.pos,
                needed: n,
                len: self.buf.len(),
            });
        }
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Consume `n` bytes (1 to 4), most significant first.
    pub fn read_be(&mut self, n: usize) -> Result<u32> {
        debug_assert!((1..=4).contains(&n));
        let bytes = self.read_bytes(n)?;
        Ok(bytes.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b)))
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_be(1)? as u8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(self.read_be(2)? as u16)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_be(4)
    }
}

/// Bit `index` of `byte`, where bit 0 is the most significant.
pub fn read_bit(byte: u8, index: u8) -> u8 {
    debug_assert!(index < 8);
    (byte >> (7 - index)) & 1
}

/// Encode the low `n * 8` bits of `value`, most significant byte first.
///
/// A `u32` holds at most four bytes, so wider requests are written as four.
pub fn write_be(n: usize, value: u32) -> Vec<u8> {
    let n = n.min(4);
    (0..n).rev().map(|i| (value >> (8 * i)) as u8).collect()
}
