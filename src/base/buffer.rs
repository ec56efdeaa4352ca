//! Mutable byte buffers.
//!
//! This module provides [`Buffer`], the growable buffer used for building
//! wire data. Before any change to its content, a buffer checks two pieces
//! of state: whether it has been [locked][Buffer::lock] and whether the
//! change would exceed an optional [maximum size][Buffer::set_max_size].
//! Either condition makes the change fail with a [`BufferError`] and leaves
//! the buffer untouched.

use super::encoding::Encoding;
use super::immutable::ImmutableBuffer;
use super::octets::{substr, ReadBuffer};
use crate::utils::base64::DecodeError;
#[cfg(feature = "bytes")]
use bytes::{Bytes, BytesMut};
use core::{fmt, ops};
use octseq::builder::{OctetsBuilder, ShortBuf};
use tracing::trace;

//------------ Buffer --------------------------------------------------------

/// A growable, lockable sequence of bytes.
///
/// The buffer exclusively owns its content. Reading happens via the
/// [`ReadBuffer`] trait or by dereferencing into a bytes slice. All changes
/// go through methods that check the lock and the size limit first.
///
/// Comparing two buffers via `==` happens in constant time.
#[derive(Clone, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "Snapshot", from = "Snapshot")
)]
pub struct Buffer {
    /// The content.
    bytes: Vec<u8>,

    /// Whether changes are currently refused.
    locked: bool,

    /// The maximum number of bytes the buffer may hold.
    max_size: Option<usize>,
}

impl Buffer {
    /// Creates a new, empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new buffer from text in the given encoding.
    pub fn from_encoded(
        scheme: Encoding,
        encoded: &str,
    ) -> Result<Self, DecodeError> {
        scheme.decode(encoded).map(Self::from)
    }

    /// Returns whether the buffer currently refuses changes.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Makes the buffer refuse all changes until it is unlocked.
    pub fn lock(&mut self) -> &mut Self {
        self.locked = true;
        trace!(len = self.bytes.len(), "buffer locked");
        self
    }

    /// Allows changes to the buffer again.
    pub fn unlock(&mut self) -> &mut Self {
        self.locked = false;
        trace!(len = self.bytes.len(), "buffer unlocked");
        self
    }

    /// Returns the maximum size if one has been set.
    pub fn max_size(&self) -> Option<usize> {
        self.max_size
    }

    /// Limits the buffer to at most `max` bytes.
    ///
    /// Fails if the buffer is locked or already holds more than `max`
    /// bytes.
    pub fn set_max_size(
        &mut self,
        max: usize,
    ) -> Result<&mut Self, BufferError> {
        self.check_unlocked()?;
        if self.bytes.len() > max {
            return Err(BufferError::MaxSizeTooSmall {
                max,
                len: self.bytes.len(),
            });
        }
        self.max_size = Some(max);
        Ok(self)
    }

    /// Removes the size limit.
    pub fn clear_max_size(&mut self) -> Result<&mut Self, BufferError> {
        self.check_unlocked()?;
        self.max_size = None;
        Ok(self)
    }

    /// Adds bytes to the end of the buffer.
    pub fn append(
        &mut self,
        data: impl AsRef<[u8]>,
    ) -> Result<&mut Self, BufferError> {
        let data = data.as_ref();
        self.check_growth(data.len())?;
        self.bytes.extend_from_slice(data);
        Ok(self)
    }

    /// Adds bytes to the start of the buffer.
    pub fn prepend(
        &mut self,
        data: impl AsRef<[u8]>,
    ) -> Result<&mut Self, BufferError> {
        let data = data.as_ref();
        self.check_growth(data.len())?;
        self.bytes.splice(0..0, data.iter().copied());
        Ok(self)
    }

    /// Shortens the buffer to `len` bytes.
    ///
    /// Fails with [`BufferError::OutOfRange`] if the buffer is shorter than
    /// `len`.
    pub fn truncate(&mut self, len: usize) -> Result<&mut Self, BufferError> {
        self.check_unlocked()?;
        if len > self.bytes.len() {
            return Err(BufferError::OutOfRange);
        }
        self.bytes.truncate(len);
        Ok(self)
    }

    /// Removes all bytes from the buffer.
    pub fn flush(&mut self) -> Result<&mut Self, BufferError> {
        self.check_unlocked()?;
        self.bytes.clear();
        Ok(self)
    }

    /// Reverses the order of the bytes in place.
    pub fn reverse(&mut self) -> Result<&mut Self, BufferError> {
        self.check_unlocked()?;
        self.bytes.reverse();
        Ok(self)
    }

    /// Returns a new buffer with a copy of part of the content.
    ///
    /// The part is selected as by [`substr`]. The new buffer is unlocked
    /// and has no size limit.
    pub fn copy(&self, offset: isize, length: Option<isize>) -> Buffer {
        Buffer::from(substr(&self.bytes, offset, length))
    }

    /// Returns an immutable copy of the content.
    pub fn to_immutable(&self) -> ImmutableBuffer {
        ImmutableBuffer::from(self.bytes.as_slice())
    }

    /// Converts the buffer into an immutable buffer.
    pub fn into_immutable(self) -> ImmutableBuffer {
        ImmutableBuffer::from(self.bytes)
    }

    /// Converts the buffer into its content.
    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }

    fn check_unlocked(&self) -> Result<(), BufferError> {
        if self.locked {
            Err(BufferError::Locked)
        } else {
            Ok(())
        }
    }

    fn check_growth(&self, additional: usize) -> Result<(), BufferError> {
        self.check_unlocked()?;
        if let Some(max) = self.max_size {
            let required = self.bytes.len().saturating_add(additional);
            if required > max {
                return Err(BufferError::Capacity { max, required });
            }
        }
        Ok(())
    }
}

//--- ReadBuffer, Deref, and AsRef

impl ReadBuffer for Buffer {
    fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl ops::Deref for Buffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

//--- From

impl From<Vec<u8>> for Buffer {
    fn from(bytes: Vec<u8>) -> Self {
        Buffer {
            bytes,
            locked: false,
            max_size: None,
        }
    }
}

impl<'a> From<&'a [u8]> for Buffer {
    fn from(bytes: &'a [u8]) -> Self {
        Self::from(bytes.to_vec())
    }
}

impl From<ImmutableBuffer> for Buffer {
    fn from(buf: ImmutableBuffer) -> Self {
        buf.into_mutable()
    }
}

#[cfg(feature = "bytes")]
impl From<Bytes> for Buffer {
    fn from(bytes: Bytes) -> Self {
        Self::from(bytes.to_vec())
    }
}

#[cfg(feature = "bytes")]
impl From<BytesMut> for Buffer {
    fn from(bytes: BytesMut) -> Self {
        Self::from(bytes.to_vec())
    }
}

#[cfg(feature = "bytes")]
impl From<Buffer> for Bytes {
    fn from(buf: Buffer) -> Self {
        Bytes::from(buf.bytes)
    }
}

//--- OctetsBuilder

impl OctetsBuilder for Buffer {
    type AppendError = BufferError;

    fn append_slice(
        &mut self,
        slice: &[u8],
    ) -> Result<(), Self::AppendError> {
        self.append(slice).map(|_| ())
    }
}

//--- PartialEq and Eq

impl<T: AsRef<[u8]> + ?Sized> PartialEq<T> for Buffer {
    fn eq(&self, other: &T) -> bool {
        self.ct_eq(other.as_ref())
    }
}

impl Eq for Buffer {}

//--- Debug

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("bytes", &format_args!("{}", self.to_base16()))
            .field("locked", &self.locked)
            .field("max_size", &self.max_size)
            .finish()
    }
}

//------------ Snapshot ------------------------------------------------------

/// The persisted state of a buffer.
///
/// A snapshot records the content and a set of flags. The only flag
/// currently defined is [`Snapshot::LOCKED`]. Restoring a buffer from a
/// snapshot reproduces content and lock state. A size limit is not part of
/// the snapshot.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    /// The content of the buffer.
    #[cfg_attr(feature = "serde", serde(with = "serde_bytes"))]
    pub bytes: Vec<u8>,

    /// The state flags.
    pub flags: u8,
}

impl Snapshot {
    /// The flag marking a locked buffer.
    pub const LOCKED: u8 = 0x01;

    /// Returns whether the snapshot is of a locked buffer.
    pub fn is_locked(&self) -> bool {
        self.flags & Self::LOCKED != 0
    }
}

impl From<Buffer> for Snapshot {
    fn from(buf: Buffer) -> Self {
        Snapshot {
            flags: if buf.locked { Snapshot::LOCKED } else { 0 },
            bytes: buf.bytes,
        }
    }
}

impl From<Snapshot> for Buffer {
    fn from(snapshot: Snapshot) -> Self {
        Buffer {
            locked: snapshot.is_locked(),
            bytes: snapshot.bytes,
            max_size: None,
        }
    }
}

//============ Error Types ===================================================

//------------ BufferError ---------------------------------------------------

/// A change to a buffer was refused.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BufferError {
    /// The buffer is locked.
    Locked,

    /// The change would grow the buffer beyond its maximum size.
    Capacity { max: usize, required: usize },

    /// The buffer already holds more bytes than the requested maximum.
    MaxSizeTooSmall { max: usize, len: usize },

    /// A position was beyond the end of the buffer.
    OutOfRange,
}

//--- From

impl From<BufferError> for ShortBuf {
    fn from(_: BufferError) -> Self {
        ShortBuf
    }
}

//--- Display and Error

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            BufferError::Locked => f.write_str("buffer is locked"),
            BufferError::Capacity { max, required } => write!(
                f,
                "buffer of maximum size {max} cannot hold {required} bytes"
            ),
            BufferError::MaxSizeTooSmall { max, len } => write!(
                f,
                "maximum size {max} is less than current length {len}"
            ),
            BufferError::OutOfRange => f.write_str("position out of range"),
        }
    }
}

impl std::error::Error for BufferError {}

//============ Testing =======================================================
