//! The read surface shared by all buffer types.
//!
//! All buffers – mutable, immutable, and fixed length – provide access to
//! their content as an octets slice. The [`ReadBuffer`] trait builds the
//! common reading operations atop that slice: slicing via [`substr`],
//! creating a [`ByteReader`], comparing in constant time, and encoding
//! into text.

use super::encoding::Encoding;
use super::reader::ByteReader;
use crate::digest::Digest;
use crate::utils::{base16, base64};

//------------ substr --------------------------------------------------------

/// Returns a part of `bytes` selected by an offset and an optional length.
///
/// This never fails. Instead, out-of-range arguments are clamped:
///
/// * `offset` is clamped into `-len..=len`. A negative offset counts from
///   the end of `bytes`.
/// * If `length` is `None`, everything from the offset is returned.
/// * A non-negative `length` selects up to that many bytes.
/// * A negative `length` drops that many bytes from the end of `bytes`.
///
/// If the selection is empty or reversed, an empty slice is returned.
pub fn substr(bytes: &[u8], offset: isize, length: Option<isize>) -> &[u8] {
    // Slices never exceed isize::MAX bytes.
    let size = bytes.len() as isize;
    let offset = offset.clamp(-size, size);
    let start = if offset < 0 { size + offset } else { offset };
    let end = match length {
        None => size,
        Some(length) if length >= 0 => {
            start.saturating_add(length).min(size)
        }
        Some(length) => size - length.saturating_neg().min(size),
    };
    if end <= start {
        return &[];
    }
    &bytes[start as usize..end as usize]
}

//------------ ReadBuffer ----------------------------------------------------

/// A type providing read access to an owned sequence of bytes.
///
/// The trait is implemented by all buffer types of this crate. Only
/// [`as_slice`][Self::as_slice] needs to be provided.
pub trait ReadBuffer {
    /// Returns the content of the buffer.
    fn as_slice(&self) -> &[u8];

    /// Returns the number of bytes in the buffer.
    fn length(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns a part of the content.
    ///
    /// See the [`substr`] function for how the arguments are interpreted.
    fn substr(&self, offset: isize, length: Option<isize>) -> &[u8] {
        substr(self.as_slice(), offset, length)
    }

    /// Returns a reader positioned at the start of the content.
    fn reader(&self) -> ByteReader<'_> {
        ByteReader::new(self.as_slice())
    }

    /// Compares the content with `other` in constant time.
    ///
    /// Sequences of different length compare unequal right away. For
    /// sequences of equal length, the time taken does not depend on their
    /// content.
    fn ct_eq(&self, other: &[u8]) -> bool {
        <[u8] as subtle::ConstantTimeEq>::ct_eq(self.as_slice(), other)
            .into()
    }

    /// Returns the content encoded with the given scheme.
    fn encode(&self, scheme: Encoding) -> String {
        scheme.encode(self.as_slice())
    }

    /// Returns the content as lower-case Base 16.
    fn to_base16(&self) -> String {
        base16::encode_string(self.as_slice())
    }

    /// Returns the content as Base 64.
    fn to_base64(&self) -> String {
        base64::encode_string(self.as_slice())
    }

    /// Returns a value for hashing the content.
    fn digest(&self) -> Digest<'_> {
        Digest::new(self.as_slice())
    }
}

impl ReadBuffer for [u8] {
    fn as_slice(&self) -> &[u8] {
        self
    }
}

impl ReadBuffer for Vec<u8> {
    fn as_slice(&self) -> &[u8] {
        self
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    const DATA: &[u8] = b"charcoal";

    #[test]
    fn substr_offsets() {
        assert_eq!(substr(DATA, 0, None), b"charcoal");
        assert_eq!(substr(DATA, 0, Some(4)), b"char");
        assert_eq!(substr(DATA, 1, Some(4)), b"harc");
        assert_eq!(substr(DATA, -4, None), b"coal");
        assert_eq!(substr(DATA, -4, Some(3)), b"coa");
        assert_eq!(substr(DATA, 2, None), b"arcoal");
    }

    #[test]
    fn substr_negative_length() {
        assert_eq!(substr(DATA, 0, Some(-4)), b"char");
        assert_eq!(substr(DATA, 2, Some(-2)), b"arco");
        assert_eq!(substr(DATA, -4, Some(-1)), b"coa");
        assert_eq!(substr(DATA, 5, Some(-4)), b"");
        assert_eq!(substr(DATA, 0, Some(-100)), b"");
    }

    #[test]
    fn substr_clamps() {
        assert_eq!(substr(DATA, 100, None), b"");
        assert_eq!(substr(DATA, -100, None), b"charcoal");
        assert_eq!(substr(DATA, 6, Some(100)), b"al");
        assert_eq!(substr(DATA, isize::MAX, Some(isize::MAX)), b"");
        assert_eq!(substr(DATA, isize::MIN, Some(isize::MIN)), b"");
        assert_eq!(substr(DATA, isize::MIN, Some(isize::MAX)), DATA);
        assert_eq!(substr(b"", 3, Some(-3)), b"");
        assert_eq!(substr(DATA, 0, Some(0)), b"");
    }

    #[test]
    fn ct_eq() {
        assert!(DATA.ct_eq(b"charcoal"));
        assert!(!DATA.ct_eq(b"charcoat"));
        assert!(!DATA.ct_eq(b"char"));
        assert!(b"".as_slice().ct_eq(b""));
    }

    #[test]
    fn ct_eq_any_position() {
        let data = vec![0x5Au8; 64];
        let mut first = data.clone();
        first[0] ^= 1;
        let mut last = data.clone();
        last[63] ^= 0x80;
        assert!(data.ct_eq(&data.clone()));
        assert!(!data.ct_eq(&first));
        assert!(!data.ct_eq(&last));
        assert!(!data.ct_eq(&data[..63]));
    }
}
