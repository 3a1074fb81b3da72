//! Bounded byte cursor used by every decode step.
//!
//! `ByteReader` is the explicit cursor threaded through recursive decoding.
//! It is created over a slice whose end is the decode bound, so a read can
//! never move past the declared body or table length: any attempt to do so
//! yields [`ObjPackError::TruncatedInput`](crate::ObjPackError::TruncatedInput).
//!
//! # Example
//!
//! ```
//! use objpack_core::reader::ByteReader;
//!
//! let data = [0x01, 0x00, 0x2A, 0xFF];
//! let mut reader = ByteReader::new(&data);
//! assert_eq!(reader.read_u8().unwrap(), 0x01);
//! assert_eq!(reader.read_u16_be().unwrap(), 0x002A);
//! assert_eq!(reader.remaining(), 1);
//! assert!(reader.read_bytes(2).is_err());
//! ```

use crate::error::{ObjPackError, Result};

/// A cursor over a bounded byte slice.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    /// Bytes up to the decode bound.
    data: &'a [u8],
    /// Current read position.
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Create a reader positioned at `pos`.
    ///
    /// Fails if `pos` lies beyond the end of `data`.
    pub fn at(data: &'a [u8], pos: usize) -> Result<Self> {
        if pos > data.len() {
            return Err(ObjPackError::truncated(0, pos, data.len()));
        }
        Ok(Self { data, pos })
    }

    /// Current cursor position.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The decode bound (length of the underlying slice).
    #[inline]
    pub fn bound(&self) -> usize {
        self.data.len()
    }

    /// Bytes left before the bound.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Whether the cursor sits at the bound.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Fail unless at least `n` bytes remain.
    #[inline]
    pub fn require(&self, n: usize) -> Result<()> {
        if self.remaining() < n {
            return Err(ObjPackError::truncated(self.pos, n, self.remaining()));
        }
        Ok(())
    }

    /// Peek at the next byte without consuming it.
    #[inline]
    pub fn peek_u8(&self) -> Result<u8> {
        self.require(1)?;
        Ok(self.data[self.pos])
    }

    /// Read one byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        let b = self.peek_u8()?;
        self.pos += 1;
        Ok(b)
    }

    /// Read a big-endian `u16` (fixed two bytes).
    #[inline]
    pub fn read_u16_be(&mut self) -> Result<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Read a little-endian `u32` (fixed four bytes).
    #[inline]
    pub fn read_u32_le(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read `n` bytes as a borrowed slice.
    #[inline]
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.require(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Skip `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.read_bytes(n).map(|_| ())
    }
}
