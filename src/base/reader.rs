//! Sequential reading of bytes.
//!
//! A [`ByteReader`] wraps a byte slice and keeps a cursor into it. The
//! cursor only moves through the sequential reading methods – [`next`],
//! [`first`], the integer readers – or when explicitly set via
//! [`set_pointer`] and [`reset`]. All other methods merely look at the
//! data.
//!
//! Unlike [`substr`][super::octets::substr], reading is strict: asking
//! for more bytes than are available is an error.
//!
//! [`next`]: ByteReader::next
//! [`first`]: ByteReader::first
//! [`set_pointer`]: ByteReader::set_pointer
//! [`reset`]: ByteReader::reset

use super::order::{ByteOrder, IntError, UInt};
use core::fmt;
use octseq::parse::{Parser, ShortInput};

//------------ ByteReader ----------------------------------------------------

/// A cursor over a borrowed byte slice.
///
/// The reader never copies or modifies the underlying data. Bytes read are
/// returned as sub-slices of the original data with the lifetime of that
/// data, so they can be kept around after the reader is gone.
#[derive(Clone, Debug)]
pub struct ByteReader<'a> {
    /// The data we are reading from.
    data: &'a [u8],

    /// The parser keeping track of the current position.
    parser: Parser<'a, [u8]>,
}

impl<'a> ByteReader<'a> {
    /// Creates a new reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        ByteReader {
            data,
            parser: Parser::from_ref(data),
        }
    }

    /// Returns the total number of bytes of the underlying data.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Returns whether all bytes have been consumed.
    pub fn is_end(&self) -> bool {
        self.parser.remaining() == 0
    }

    /// Returns the current position of the cursor.
    pub fn pos(&self) -> usize {
        self.parser.pos()
    }

    /// Returns the number of bytes after the cursor.
    pub fn remaining(&self) -> usize {
        self.parser.remaining()
    }

    /// Moves the cursor back to the start of the data.
    pub fn reset(&mut self) -> &mut Self {
        self.parser = Parser::from_ref(self.data);
        self
    }

    /// Moves the cursor to the given position.
    ///
    /// The position may be anywhere from the start up to and including the
    /// end of the data.
    pub fn set_pointer(
        &mut self,
        pos: usize,
    ) -> Result<&mut Self, ReadError> {
        if pos > self.size() {
            return Err(ReadError::Position {
                pos,
                size: self.size(),
            });
        }
        self.parser.seek(pos)?;
        Ok(self)
    }

    /// Returns the next `len` bytes and advances the cursor past them.
    pub fn next(&mut self, len: usize) -> Result<&'a [u8], ReadError> {
        let start = self.pos();
        self.check_len(len)?;
        self.parser.advance(len)?;
        Ok(&self.data[start..start + len])
    }

    /// Returns the first `len` bytes of the data.
    ///
    /// On success, the cursor is positioned after the returned bytes. If
    /// the data is shorter than `len`, the cursor stays where it was.
    pub fn first(&mut self, len: usize) -> Result<&'a [u8], ReadError> {
        if len > self.size() {
            return Err(ReadError::Underflow {
                requested: len,
                available: self.size(),
            });
        }
        self.reset().next(len)
    }

    /// Returns up to the next `len` bytes without moving the cursor.
    ///
    /// If fewer than `len` bytes remain, only those are returned. Asking
    /// for zero bytes is an error.
    pub fn look_ahead(&self, len: usize) -> Result<&'a [u8], ReadError> {
        if len < 1 {
            return Err(ReadError::InvalidCount);
        }
        let start = self.pos();
        let end = start.saturating_add(len).min(self.size());
        Ok(&self.data[start..end])
    }

    /// Returns the `len` bytes right before the cursor without moving it.
    pub fn look_behind(&self, len: usize) -> Result<&'a [u8], ReadError> {
        if len < 1 {
            return Err(ReadError::InvalidCount);
        }
        let pos = self.pos();
        if len > pos {
            return Err(ReadError::Underflow {
                requested: len,
                available: pos,
            });
        }
        Ok(&self.data[pos - len..pos])
    }

    /// Returns all bytes after the cursor without moving it.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos()..]
    }

    /// Reads a single byte.
    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        self.check_len(1)?;
        self.parser.parse_u8().map_err(Into::into)
    }

    /// Reads a little-endian 16 bit unsigned integer.
    pub fn read_u16_le(&mut self) -> Result<u16, ReadError> {
        self.read_array().map(u16::from_le_bytes)
    }

    /// Reads a big-endian 16 bit unsigned integer.
    pub fn read_u16_be(&mut self) -> Result<u16, ReadError> {
        self.read_array().map(u16::from_be_bytes)
    }

    /// Reads a little-endian 32 bit unsigned integer.
    pub fn read_u32_le(&mut self) -> Result<u32, ReadError> {
        self.read_array().map(u32::from_le_bytes)
    }

    /// Reads a big-endian 32 bit unsigned integer.
    pub fn read_u32_be(&mut self) -> Result<u32, ReadError> {
        self.read_array().map(u32::from_be_bytes)
    }

    /// Reads a little-endian 64 bit unsigned integer.
    pub fn read_u64_le(&mut self) -> Result<u64, ReadError> {
        self.read_array().map(u64::from_le_bytes)
    }

    /// Reads a big-endian 64 bit unsigned integer.
    pub fn read_u64_be(&mut self) -> Result<u64, ReadError> {
        self.read_array().map(u64::from_be_bytes)
    }

    /// Reads an unsigned integer of the given width and byte order.
    pub fn read_uint(
        &mut self,
        order: ByteOrder,
        width: UInt,
    ) -> Result<u64, ReadError> {
        let bytes = self.next(width.size())?;
        order.unpack(bytes, width).map_err(Into::into)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ReadError> {
        self.check_len(N)?;
        let mut buf = [0u8; N];
        self.parser.parse_buf(&mut buf)?;
        Ok(buf)
    }

    fn check_len(&self, len: usize) -> Result<(), ReadError> {
        if len > self.remaining() {
            Err(ReadError::Underflow {
                requested: len,
                available: self.remaining(),
            })
        } else {
            Ok(())
        }
    }
}

//============ Error Types ===================================================

//------------ ReadError -----------------------------------------------------

/// Reading from a [`ByteReader`] failed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReadError {
    /// More bytes were requested than are available.
    Underflow { requested: usize, available: usize },

    /// A non-positive number of bytes was requested.
    InvalidCount,

    /// The cursor was to be moved beyond the end of the data.
    Position { pos: usize, size: usize },
}

//--- From

impl From<ShortInput> for ReadError {
    fn from(_: ShortInput) -> Self {
        ReadError::Underflow {
            requested: 1,
            available: 0,
        }
    }
}

impl From<IntError> for ReadError {
    fn from(err: IntError) -> Self {
        match err {
            IntError::Length { expected, actual } => ReadError::Underflow {
                requested: expected,
                available: actual,
            },
            IntError::Overflow { width, .. } => ReadError::Underflow {
                requested: width.size(),
                available: 0,
            },
        }
    }
}

//--- Display and Error

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ReadError::Underflow {
                requested,
                available,
            } => write!(
                f,
                "attempt to read {requested} bytes, while only {available} \
                 available"
            ),
            ReadError::InvalidCount => {
                f.write_str("expected positive number of bytes to read")
            }
            ReadError::Position { pos, size } => write!(
                f,
                "pointer position {pos} out of range for {size} bytes"
            ),
        }
    }
}

impl std::error::Error for ReadError {}

//============ Testing =======================================================
