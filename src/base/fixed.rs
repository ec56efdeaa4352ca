//! Fixed-length byte buffers.
//!
//! Many binary values have a length known at compile time: digests, keys,
//! nonces. The types in this module carry that length as a const generic
//! parameter so a value of the wrong length cannot be constructed.
//!
//! [`FixedBuffer`] is immutable and the type normally used. Values can be
//! built in place via [`FixedBufferMut`] and then frozen. Type aliases are
//! provided for commonly used lengths.

use super::buffer::BufferError;
use super::encoding::Encoding;
use super::octets::ReadBuffer;
use crate::utils::base64::DecodeError;
use core::fmt;
use ring::rand::{SecureRandom, SystemRandom};
use tracing::trace;

//------------ Type Aliases --------------------------------------------------

/// A 16 byte buffer.
pub type Bytes16 = FixedBuffer<16>;

/// A 20 byte buffer, the size of a SHA-1 digest.
pub type Bytes20 = FixedBuffer<20>;

/// A 24 byte buffer.
pub type Bytes24 = FixedBuffer<24>;

/// A 32 byte buffer, the size of a SHA-256 digest.
pub type Bytes32 = FixedBuffer<32>;

/// A 64 byte buffer, the size of a SHA-512 digest.
pub type Bytes64 = FixedBuffer<64>;

//------------ FixedBuffer ---------------------------------------------------

/// An immutable buffer of exactly `N` bytes.
///
/// `N` must not be zero. Using a zero length fails at compile time.
///
/// Comparing two buffers via `==` happens in constant time.
#[derive(Clone, Copy)]
pub struct FixedBuffer<const N: usize>([u8; N]);

impl<const N: usize> FixedBuffer<N> {
    /// The length of the buffer.
    pub const LEN: usize = N;

    const NON_EMPTY: () = assert!(N > 0, "fixed buffers cannot be empty");

    /// Creates a buffer from an array.
    pub const fn from_array(bytes: [u8; N]) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NON_EMPTY;
        FixedBuffer(bytes)
    }

    /// Creates a buffer from a slice of exactly `N` bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, LengthError> {
        let bytes: [u8; N] = bytes
            .try_into()
            .map_err(|_| LengthError::new(N, bytes.len()))?;
        Ok(Self::from_array(bytes))
    }

    /// Creates a buffer from up to `N` bytes left-padded with zeros.
    pub fn from_padded(bytes: &[u8]) -> Result<Self, LengthError> {
        if bytes.len() > N {
            return Err(LengthError::new(N, bytes.len()));
        }
        let mut res = [0u8; N];
        res[N - bytes.len()..].copy_from_slice(bytes);
        Ok(Self::from_array(res))
    }

    /// Creates a buffer from text in the given encoding.
    ///
    /// The decoded data must be exactly `N` bytes long.
    pub fn from_encoded(
        scheme: Encoding,
        encoded: &str,
    ) -> Result<Self, FromEncodedError> {
        let bytes = scheme.decode(encoded)?;
        Self::from_slice(&bytes).map_err(Into::into)
    }

    /// Creates a buffer filled with cryptographically secure random bytes.
    pub fn random() -> Result<Self, RandomError> {
        let mut res = [0u8; N];
        SystemRandom::new().fill(&mut res).map_err(|_| RandomError)?;
        Ok(Self::from_array(res))
    }

    /// Returns a reference to the underlying array.
    pub fn as_array(&self) -> &[u8; N] {
        &self.0
    }

    /// Converts the buffer into the underlying array.
    pub fn into_array(self) -> [u8; N] {
        self.0
    }

    /// Returns whether the first byte is zero.
    pub fn is_padded(&self) -> bool {
        self.0[0] == 0
    }

    /// Returns whether all bytes are zero.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&ch| ch == 0)
    }

    /// Returns the content without leading and trailing padding.
    ///
    /// Padding consists of the bytes in [`TRIM_BYTES`]. These are zero,
    /// space, tab, line feed, carriage return, and vertical tab.
    pub fn trimmed(&self) -> &[u8] {
        trim_end(trim_start(&self.0))
    }

    /// Returns the content without leading padding.
    pub fn trimmed_start(&self) -> &[u8] {
        trim_start(&self.0)
    }

    /// Returns the content without trailing padding.
    pub fn trimmed_end(&self) -> &[u8] {
        trim_end(&self.0)
    }

    /// Returns whether the buffer is equal to any in `list`.
    pub fn in_slice(&self, list: &[Self]) -> bool {
        list.iter().any(|item| item == self)
    }

    /// Returns a mutable, unlocked copy of the buffer.
    pub fn to_mutable(&self) -> FixedBufferMut<N> {
        FixedBufferMut {
            bytes: self.0,
            locked: false,
        }
    }
}

/// The bytes removed by [`FixedBuffer::trimmed`].
pub const TRIM_BYTES: &[u8] = b" \t\n\r\0\x0B";

fn trim_start(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|ch| !TRIM_BYTES.contains(ch))
        .unwrap_or(data.len());
    &data[start..]
}

fn trim_end(data: &[u8]) -> &[u8] {
    let end = data
        .iter()
        .rposition(|ch| !TRIM_BYTES.contains(ch))
        .map_or(0, |pos| pos + 1);
    &data[..end]
}

//--- ReadBuffer and AsRef

impl<const N: usize> ReadBuffer for FixedBuffer<N> {
    fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize> AsRef<[u8]> for FixedBuffer<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

//--- From and TryFrom

impl<const N: usize> From<[u8; N]> for FixedBuffer<N> {
    fn from(bytes: [u8; N]) -> Self {
        Self::from_array(bytes)
    }
}

impl<'a, const N: usize> TryFrom<&'a [u8]> for FixedBuffer<N> {
    type Error = LengthError;

    fn try_from(bytes: &'a [u8]) -> Result<Self, Self::Error> {
        Self::from_slice(bytes)
    }
}

//--- PartialEq and Eq

impl<T, const N: usize> PartialEq<T> for FixedBuffer<N>
where
    T: AsRef<[u8]> + ?Sized,
{
    fn eq(&self, other: &T) -> bool {
        self.ct_eq(other.as_ref())
    }
}

impl<const N: usize> Eq for FixedBuffer<N> {}

//--- Debug

impl<const N: usize> fmt::Debug for FixedBuffer<N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "FixedBuffer<{}>({})", N, self.to_base16())
    }
}

//--- Serialize and Deserialize

#[cfg(feature = "serde")]
impl<const N: usize> serde::Serialize for FixedBuffer<N> {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de, const N: usize> serde::Deserialize<'de> for FixedBuffer<N> {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        use serde::Deserialize;

        let bytes = serde_bytes::ByteBuf::deserialize(deserializer)?;
        Self::from_slice(&bytes).map_err(serde::de::Error::custom)
    }
}

//------------ FixedBufferMut ------------------------------------------------

/// A mutable buffer of exactly `N` bytes.
///
/// The buffer starts out zeroed. Its length never changes, only its
/// content. Like [`Buffer`][super::buffer::Buffer] it can be locked to
/// refuse changes.
#[derive(Clone)]
pub struct FixedBufferMut<const N: usize> {
    bytes: [u8; N],
    locked: bool,
}

impl<const N: usize> FixedBufferMut<N> {
    /// Creates a new zeroed buffer.
    #[must_use]
    pub fn new() -> Self {
        FixedBuffer::from_array([0; N]).to_mutable()
    }

    /// Returns whether the buffer currently refuses changes.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Makes the buffer refuse all changes until it is unlocked.
    pub fn lock(&mut self) -> &mut Self {
        self.locked = true;
        trace!(len = N, "fixed buffer locked");
        self
    }

    /// Allows changes to the buffer again.
    pub fn unlock(&mut self) -> &mut Self {
        self.locked = false;
        trace!(len = N, "fixed buffer unlocked");
        self
    }

    /// Overwrites the content starting at `offset` with `data`.
    pub fn write_at(
        &mut self,
        offset: usize,
        data: &[u8],
    ) -> Result<&mut Self, BufferError> {
        self.check_unlocked()?;
        let end = offset
            .checked_add(data.len())
            .filter(|&end| end <= N)
            .ok_or(BufferError::OutOfRange)?;
        self.bytes[offset..end].copy_from_slice(data);
        Ok(self)
    }

    /// Reverses the order of the bytes in place.
    pub fn reverse(&mut self) -> Result<&mut Self, BufferError> {
        self.check_unlocked()?;
        self.bytes.reverse();
        Ok(self)
    }

    /// Sets all bytes to zero.
    pub fn flush(&mut self) -> Result<&mut Self, BufferError> {
        self.check_unlocked()?;
        self.bytes = [0; N];
        Ok(self)
    }

    /// Converts the buffer into an immutable buffer.
    pub fn freeze(self) -> FixedBuffer<N> {
        FixedBuffer::from_array(self.bytes)
    }

    fn check_unlocked(&self) -> Result<(), BufferError> {
        if self.locked {
            Err(BufferError::Locked)
        } else {
            Ok(())
        }
    }
}

impl<const N: usize> Default for FixedBufferMut<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ReadBuffer for FixedBufferMut<N> {
    fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl<const N: usize> fmt::Debug for FixedBufferMut<N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FixedBufferMut")
            .field("bytes", &format_args!("{}", self.to_base16()))
            .field("locked", &self.locked)
            .finish()
    }
}

//============ Error Types ===================================================

//------------ LengthError ---------------------------------------------------

/// The data for a fixed-length buffer had the wrong length.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LengthError {
    /// The length of the buffer.
    pub expected: usize,

    /// The length of the data provided.
    pub actual: usize,
}

impl LengthError {
    fn new(expected: usize, actual: usize) -> Self {
        LengthError { expected, actual }
    }
}

impl fmt::Display for LengthError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "expected {} bytes, got {}",
            self.expected, self.actual
        )
    }
}

impl std::error::Error for LengthError {}

//------------ FromEncodedError ----------------------------------------------

/// A fixed-length buffer could not be created from encoded text.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FromEncodedError {
    /// The text was not correctly encoded.
    Decode(DecodeError),

    /// The decoded data had the wrong length.
    Length(LengthError),
}

impl From<DecodeError> for FromEncodedError {
    fn from(err: DecodeError) -> Self {
        FromEncodedError::Decode(err)
    }
}

impl From<LengthError> for FromEncodedError {
    fn from(err: LengthError) -> Self {
        FromEncodedError::Length(err)
    }
}

impl fmt::Display for FromEncodedError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            FromEncodedError::Decode(ref err) => fmt::Display::fmt(err, f),
            FromEncodedError::Length(ref err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for FromEncodedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            FromEncodedError::Decode(ref err) => Some(err),
            FromEncodedError::Length(ref err) => Some(err),
        }
    }
}

//------------ RandomError ---------------------------------------------------

/// The system’s random number generator failed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RandomError;

impl fmt::Display for RandomError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("failed to obtain random bytes")
    }
}

impl std::error::Error for RandomError {}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(15)]
    #[case(17)]
    #[case(32)]
    fn wrong_length(#[case] len: usize) {
        assert_eq!(
            Bytes16::from_slice(&vec![0xAB; len]).unwrap_err(),
            LengthError {
                expected: 16,
                actual: len
            }
        );
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(10)]
    #[case(20)]
    fn padded(#[case] len: usize) {
        let buf = Bytes20::from_padded(&vec![0xAB; len]).unwrap();
        assert_eq!(buf.length(), 20);
        assert!(buf.as_array()[..20 - len].iter().all(|&ch| ch == 0));
        assert!(buf.as_array()[20 - len..].iter().all(|&ch| ch == 0xAB));
        assert_eq!(buf.is_padded(), len < 20);
        assert!(Bytes20::from_padded(&[1; 21]).is_err());
    }

    fn check_all_lengths<const N: usize>() {
        assert!(FixedBuffer::<N>::from_slice(&vec![1; N]).is_ok());
        assert!(FixedBuffer::<N>::from_slice(&vec![1; N - 1]).is_err());
        assert!(FixedBuffer::<N>::from_slice(&vec![1; N + 1]).is_err());
        let padded = FixedBuffer::<N>::from_padded(b"\x01").unwrap();
        assert_eq!(padded.length(), N);
        assert_eq!(padded.as_array()[N - 1], 1);
    }

    #[test]
    fn aliases() {
        check_all_lengths::<16>();
        check_all_lengths::<20>();
        check_all_lengths::<24>();
        check_all_lengths::<32>();
        check_all_lengths::<64>();
    }

    #[test]
    fn empty_and_trimmed() {
        let zero = Bytes16::from_array([0; 16]);
        assert!(zero.is_empty());
        assert!(zero.is_padded());
        assert_eq!(zero.trimmed(), b"");

        let text = Bytes16::from_padded(b"furqan  ").unwrap();
        assert!(!text.is_empty());
        assert_eq!(text.trimmed(), b"furqan");
    }

    #[test]
    fn trim_bytes() {
        let mut array = [0u8; 8];
        array[..7].copy_from_slice(b"\t\x0Bab\r\n ");
        let buf = FixedBuffer::from_array(array);
        assert_eq!(buf.trimmed(), b"ab");
        assert_eq!(buf.trimmed_start(), b"ab\r\n \0");
        assert_eq!(buf.trimmed_end(), b"\t\x0Bab");

        // Form feed is not padding.
        let buf = FixedBuffer::from_array(*b"\x0Cab\x0C");
        assert_eq!(buf.trimmed(), b"\x0Cab\x0C");
        let buf = FixedBuffer::from_array(*b"\0\x0C\0");
        assert_eq!(buf.trimmed(), b"\x0C");
        assert_eq!(buf.trimmed_start(), b"\x0C\0");
    }

    #[test]
    fn random_and_in_slice() {
        let one = Bytes32::random().unwrap();
        let two = Bytes32::random().unwrap();
        assert_ne!(one, two);
        assert!(one.in_slice(&[two, one]));
        assert!(!one.in_slice(&[two]));
    }

    #[test]
    fn from_encoded() {
        let buf = Bytes16::from_encoded(
            Encoding::Base16,
            "0x000102030405060708090a0b0c0d0e0f",
        )
        .unwrap();
        assert_eq!(buf.as_array()[15], 0x0f);
        assert_eq!(
            Bytes16::from_encoded(Encoding::Base16, "0102").unwrap_err(),
            FromEncodedError::Length(LengthError {
                expected: 16,
                actual: 2
            })
        );
    }

    #[test]
    fn mutable() {
        let mut buf = FixedBufferMut::<4>::new();
        buf.write_at(1, b"\x01\x02").unwrap();
        assert_eq!(buf.as_slice(), b"\x00\x01\x02\x00");
        assert_eq!(
            buf.write_at(3, b"\x01\x02").unwrap_err(),
            BufferError::OutOfRange
        );
        buf.reverse().unwrap();
        assert_eq!(buf.as_slice(), b"\x00\x02\x01\x00");
        buf.lock();
        assert_eq!(buf.flush().unwrap_err(), BufferError::Locked);
        assert_eq!(
            buf.write_at(0, b"\x09").unwrap_err(),
            BufferError::Locked
        );
        buf.unlock();
        buf.flush().unwrap();
        assert!(buf.freeze().is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn ser_de() {
        use serde_test::{assert_de_tokens_error, assert_tokens, Token};

        assert_tokens(
            &FixedBuffer::from_array([1u8, 2]),
            &[Token::Bytes(b"\x01\x02")],
        );
        assert_de_tokens_error::<FixedBuffer<2>>(
            &[Token::Bytes(b"\x01")],
            "expected 2 bytes, got 1",
        );
    }
}
