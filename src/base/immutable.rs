//! Immutable byte buffers.

use super::buffer::Buffer;
use super::encoding::Encoding;
use super::octets::ReadBuffer;
use crate::utils::base64::DecodeError;
#[cfg(feature = "bytes")]
use bytes::Bytes;
use core::{fmt, ops};

//------------ ImmutableBuffer -----------------------------------------------

/// A sequence of bytes that never changes.
///
/// Once created, the content of the buffer stays the same for its entire
/// lifetime. Transformations such as [`with_appended`] leave the buffer
/// alone and return a new one instead, so a value can be shared freely
/// between readers.
///
/// Comparing two buffers via `==` happens in constant time.
///
/// [`with_appended`]: ImmutableBuffer::with_appended
#[derive(Clone, Default)]
pub struct ImmutableBuffer {
    bytes: Box<[u8]>,
}

impl ImmutableBuffer {
    /// Creates a new buffer from text in the given encoding.
    pub fn from_encoded(
        scheme: Encoding,
        encoded: &str,
    ) -> Result<Self, DecodeError> {
        scheme.decode(encoded).map(Self::from)
    }

    /// Returns a new buffer with `data` added to the end.
    #[must_use]
    pub fn with_appended(&self, data: impl AsRef<[u8]>) -> Self {
        let data = data.as_ref();
        let mut bytes = Vec::with_capacity(self.bytes.len() + data.len());
        bytes.extend_from_slice(&self.bytes);
        bytes.extend_from_slice(data);
        Self::from(bytes)
    }

    /// Returns a new buffer with `data` added to the start.
    #[must_use]
    pub fn with_prepended(&self, data: impl AsRef<[u8]>) -> Self {
        let data = data.as_ref();
        let mut bytes = Vec::with_capacity(self.bytes.len() + data.len());
        bytes.extend_from_slice(data);
        bytes.extend_from_slice(&self.bytes);
        Self::from(bytes)
    }

    /// Converts the buffer into an unlocked mutable buffer.
    pub fn into_mutable(self) -> Buffer {
        Buffer::from(self.bytes.into_vec())
    }
}

//--- ReadBuffer, Deref, and AsRef

impl ReadBuffer for ImmutableBuffer {
    fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl ops::Deref for ImmutableBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsRef<[u8]> for ImmutableBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

//--- From

impl From<Vec<u8>> for ImmutableBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        ImmutableBuffer {
            bytes: bytes.into_boxed_slice(),
        }
    }
}

impl<'a> From<&'a [u8]> for ImmutableBuffer {
    fn from(bytes: &'a [u8]) -> Self {
        ImmutableBuffer { bytes: bytes.into() }
    }
}

impl From<Buffer> for ImmutableBuffer {
    fn from(buf: Buffer) -> Self {
        buf.into_immutable()
    }
}

#[cfg(feature = "bytes")]
impl From<Bytes> for ImmutableBuffer {
    fn from(bytes: Bytes) -> Self {
        Self::from(bytes.as_ref())
    }
}

#[cfg(feature = "bytes")]
impl From<ImmutableBuffer> for Bytes {
    fn from(buf: ImmutableBuffer) -> Self {
        Bytes::from(buf.bytes.into_vec())
    }
}

//--- PartialEq and Eq

impl<T: AsRef<[u8]> + ?Sized> PartialEq<T> for ImmutableBuffer {
    fn eq(&self, other: &T) -> bool {
        self.ct_eq(other.as_ref())
    }
}

impl Eq for ImmutableBuffer {}

//--- Debug

impl fmt::Debug for ImmutableBuffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("ImmutableBuffer")
            .field(&format_args!("{}", self.to_base16()))
            .finish()
    }
}

//--- Serialize and Deserialize

#[cfg(feature = "serde")]
impl serde::Serialize for ImmutableBuffer {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.bytes)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ImmutableBuffer {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        use serde::Deserialize;

        serde_bytes::ByteBuf::deserialize(deserializer)
            .map(|bytes| Self::from(bytes.into_vec()))
    }
}

//============ Testing =======================================================
