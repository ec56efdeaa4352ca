//! Byte order and unsigned integer widths.
//!
//! Multi-byte integers on the wire are packed either in little-endian or
//! big-endian byte order. The [`ByteOrder`] type selects one of the two and
//! provides packing and unpacking of unsigned integers for the widths
//! described by [`UInt`].

use core::fmt;
use std::sync::OnceLock;

//------------ ByteOrder -----------------------------------------------------

/// The order of bytes within a packed multi-byte integer.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ByteOrder {
    /// The least significant byte comes first.
    LittleEndian,

    /// The most significant byte comes first.
    ///
    /// This is also known as network byte order.
    BigEndian,
}

/// The byte order of the host, determined once on first access.
static NATIVE: OnceLock<ByteOrder> = OnceLock::new();

impl ByteOrder {
    /// Returns the byte order of the machine we are running on.
    ///
    /// The value is computed from the bytes of `1u16` on first use and
    /// cached for the lifetime of the process.
    pub fn native() -> Self {
        *NATIVE.get_or_init(|| {
            if 1u16.to_ne_bytes() == 1u16.to_le_bytes() {
                ByteOrder::LittleEndian
            } else {
                ByteOrder::BigEndian
            }
        })
    }

    /// Returns whether the host is little-endian.
    pub fn is_native_little_endian() -> bool {
        Self::native() == ByteOrder::LittleEndian
    }

    /// Returns whether the host is big-endian.
    pub fn is_native_big_endian() -> bool {
        !Self::is_native_little_endian()
    }

    /// Returns a copy of `bytes` in reversed order.
    pub fn swap(bytes: &[u8]) -> Vec<u8> {
        bytes.iter().rev().copied().collect()
    }

    /// Packs an integer of up to 32 bits into `width` bytes.
    ///
    /// Fails if the value doesn’t fit into the width or if `width` is
    /// [`UInt::Bytes8`]. Use [`pack64`][Self::pack64] for those.
    pub fn pack32(
        self,
        width: UInt,
        value: u64,
    ) -> Result<Vec<u8>, IntError> {
        if width == UInt::Bytes8 || !width.fits(value) {
            return Err(IntError::Overflow { width, value });
        }
        Ok(self.pack_unchecked(width, value))
    }

    /// Unpacks an integer of up to 32 bits from exactly `width` bytes.
    pub fn unpack32(
        self,
        bytes: &[u8],
        width: UInt,
    ) -> Result<u32, IntError> {
        if width == UInt::Bytes8 {
            return Err(IntError::Overflow {
                width,
                value: u64::from(u32::MAX) + 1,
            });
        }
        // Lossless: at most four bytes were combined.
        self.unpack(bytes, width).map(|value| value as u32)
    }

    /// Packs an integer of any supported width.
    pub fn pack64(
        self,
        width: UInt,
        value: u64,
    ) -> Result<Vec<u8>, IntError> {
        if !width.fits(value) {
            return Err(IntError::Overflow { width, value });
        }
        Ok(self.pack_unchecked(width, value))
    }

    /// Unpacks an integer of any supported width from exactly `width` bytes.
    pub fn unpack(self, bytes: &[u8], width: UInt) -> Result<u64, IntError> {
        if bytes.len() != width.size() {
            return Err(IntError::Length {
                expected: width.size(),
                actual: bytes.len(),
            });
        }
        let fold = |acc: u64, byte: &u8| acc << 8 | u64::from(*byte);
        Ok(match self {
            ByteOrder::BigEndian => bytes.iter().fold(0, fold),
            ByteOrder::LittleEndian => bytes.iter().rev().fold(0, fold),
        })
    }

    fn pack_unchecked(self, width: UInt, value: u64) -> Vec<u8> {
        let size = width.size();
        match self {
            ByteOrder::BigEndian => value.to_be_bytes()[8 - size..].to_vec(),
            ByteOrder::LittleEndian => value.to_le_bytes()[..size].to_vec(),
        }
    }
}

//--- Display

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ByteOrder::LittleEndian => f.write_str("little-endian"),
            ByteOrder::BigEndian => f.write_str("big-endian"),
        }
    }
}

//------------ UInt ----------------------------------------------------------

/// The width of an unsigned integer.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum UInt {
    /// A single byte, 8 bits.
    Byte,

    /// Two bytes, 16 bits.
    Bytes2,

    /// Four bytes, 32 bits.
    Bytes4,

    /// Eight bytes, 64 bits.
    Bytes8,
}

impl UInt {
    /// Returns the number of bits of the width.
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            UInt::Byte => 8,
            UInt::Bytes2 => 16,
            UInt::Bytes4 => 32,
            UInt::Bytes8 => 64,
        }
    }

    /// Returns the number of bytes of the width.
    #[must_use]
    pub const fn size(self) -> usize {
        (self.bits() >> 3) as usize
    }

    /// Returns the largest value representable in this width.
    #[must_use]
    pub const fn max_value(self) -> u64 {
        match self {
            UInt::Byte => 0xFF,
            UInt::Bytes2 => 0xFFFF,
            UInt::Bytes4 => 0xFFFF_FFFF,
            UInt::Bytes8 => u64::MAX,
        }
    }

    /// Returns the smallest width that can hold `value`.
    #[must_use]
    pub const fn for_value(value: u64) -> Self {
        if value <= 0xFF {
            UInt::Byte
        } else if value <= 0xFFFF {
            UInt::Bytes2
        } else if value <= 0xFFFF_FFFF {
            UInt::Bytes4
        } else {
            UInt::Bytes8
        }
    }

    /// Returns whether `value` fits into this width.
    #[must_use]
    pub const fn fits(self, value: u64) -> bool {
        value <= self.max_value()
    }
}

impl fmt::Display for UInt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "UInt{}", self.bits())
    }
}

//============ Error Types ===================================================

//------------ IntError ------------------------------------------------------

/// An integer could not be packed or unpacked.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IntError {
    /// The value does not fit into the requested width.
    Overflow { width: UInt, value: u64 },

    /// The input did not have the number of bytes the width requires.
    Length { expected: usize, actual: usize },
}

impl fmt::Display for IntError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            IntError::Overflow { width, value } => {
                write!(f, "integer {value} cannot be packed as {width}")
            }
            IntError::Length { expected, actual } => write!(
                f,
                "input must be {expected} bytes long, got {actual}"
            ),
        }
    }
}

impl std::error::Error for IntError {}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn native_is_cached() {
        let first = ByteOrder::native();
        assert_eq!(first, ByteOrder::native());
        assert_ne!(
            ByteOrder::is_native_little_endian(),
            ByteOrder::is_native_big_endian()
        );
        #[cfg(target_endian = "little")]
        assert_eq!(first, ByteOrder::LittleEndian);
        #[cfg(target_endian = "big")]
        assert_eq!(first, ByteOrder::BigEndian);
    }

    #[test]
    fn pack32() {
        let be = ByteOrder::BigEndian;
        let le = ByteOrder::LittleEndian;
        assert_eq!(be.pack32(UInt::Byte, 0x12).unwrap(), b"\x12");
        assert_eq!(be.pack32(UInt::Bytes2, 0x1234).unwrap(), b"\x12\x34");
        assert_eq!(le.pack32(UInt::Bytes2, 0x1234).unwrap(), b"\x34\x12");
        assert_eq!(
            be.pack32(UInt::Bytes4, 0x1234_5678).unwrap(),
            b"\x12\x34\x56\x78"
        );
        assert_eq!(
            le.pack32(UInt::Bytes4, 0x1234_5678).unwrap(),
            b"\x78\x56\x34\x12"
        );
        assert_eq!(
            be.pack32(UInt::Byte, 256),
            Err(IntError::Overflow { width: UInt::Byte, value: 256 })
        );
        assert!(be.pack32(UInt::Bytes8, 1).is_err());
    }

    #[test]
    fn unpack() {
        let be = ByteOrder::BigEndian;
        let le = ByteOrder::LittleEndian;
        assert_eq!(be.unpack32(b"\x01\x2c", UInt::Bytes2).unwrap(), 300);
        assert_eq!(le.unpack32(b"\x2c\x01", UInt::Bytes2).unwrap(), 300);
        assert_eq!(
            be.unpack32(b"\x01", UInt::Bytes2),
            Err(IntError::Length { expected: 2, actual: 1 })
        );
        assert_eq!(
            be.unpack(b"\x11\x22\x33\x44\x55\x66\x77\x88", UInt::Bytes8)
                .unwrap(),
            0x1122_3344_5566_7788
        );
        assert_eq!(
            le.pack64(UInt::Bytes8, 0x1122_3344_5566_7788).unwrap(),
            b"\x88\x77\x66\x55\x44\x33\x22\x11"
        );
    }

    #[test]
    fn widths() {
        assert_eq!(UInt::for_value(0), UInt::Byte);
        assert_eq!(UInt::for_value(255), UInt::Byte);
        assert_eq!(UInt::for_value(256), UInt::Bytes2);
        assert_eq!(UInt::for_value(0x1_0000), UInt::Bytes4);
        assert_eq!(UInt::for_value(0x1_0000_0000), UInt::Bytes8);
        assert!(UInt::Bytes2.fits(65535));
        assert!(!UInt::Bytes2.fits(65536));
        assert_eq!(UInt::Bytes4.size(), 4);
    }

    #[test]
    fn swap() {
        assert_eq!(ByteOrder::swap(b"\xa1\xb2\xc3"), b"\xc3\xb2\xa1");
        assert_eq!(ByteOrder::swap(b""), b"");
    }
}
