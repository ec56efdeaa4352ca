//! Basics.
//!
//! This module provides the fundamental types for working with binary
//! data: buffers owning bytes, a reader for consuming them, and helpers
//! for the byte order of integers.
//!
//!
//! # Buffers
//!
//! There are three families of buffers, differing in what can be done to
//! them after creation:
//!
//! * [`Buffer`] is growable. Bytes can be appended, prepended, or removed
//!   unless the buffer has been locked or the change would exceed its
//!   optional maximum size.
//! * [`ImmutableBuffer`] never changes. Transformations return new
//!   buffers.
//! * [`FixedBuffer`] holds exactly `N` bytes with `N` known at compile
//!   time. It comes with a mutable companion, [`FixedBufferMut`], and
//!   aliases for common lengths such as [`Bytes32`].
//!
//! All buffers share the read surface defined by the [`ReadBuffer`] trait.
//! This includes the forgiving [`substr`] which clamps out-of-range
//! arguments instead of failing, conversion into text via an
//! [`Encoding`], and comparison in constant time.
//!
//!
//! # Reading
//!
//! In contrast to slicing, the [`ByteReader`] is strict: it consumes bytes
//! from the start of its data and fails if asked for more bytes than are
//! left. It is the basis for parsing wire data.
//!
//!
//! # Byte Order
//!
//! The [`ByteOrder`] and [`UInt`] types describe how unsigned integers are
//! represented on the wire and provide packing and unpacking.

//--- Re-exports

pub use self::buffer::{Buffer, BufferError, Snapshot};
pub use self::encoding::Encoding;
pub use self::fixed::{
    Bytes16, Bytes20, Bytes24, Bytes32, Bytes64, FixedBuffer,
    FixedBufferMut, FromEncodedError, LengthError, RandomError, TRIM_BYTES,
};
pub use self::immutable::ImmutableBuffer;
pub use self::octets::{substr, ReadBuffer};
pub use self::order::{ByteOrder, IntError, UInt};
pub use self::reader::{ByteReader, ReadError};

//--- Modules

pub mod buffer;
pub mod encoding;
pub mod fixed;
pub mod immutable;
pub mod octets;
pub mod order;
pub mod reader;
