//! A compact tag-length-value wire format.
//!
//! This module implements a binary format for exchanging small structured
//! messages. A message, called an [`Envelope`], belongs to a protocol and
//! consists of one or more [`Frame`]s. Each frame has a code and carries a
//! list of typed parameters. Everything that appears on the wire as a code
//! is a closed enum implementing [`Code`], usually created via the
//! [`tlv_enum!`][crate::tlv_enum] macro.
//!
//! Protocols are plugged into the codec through a [`ProtocolDefinition`].
//! The protocol decides the byte order of multi-byte integers and the
//! [`Limits`] that both encoding and decoding enforce. The parameter type
//! decides how a [`Value`] is turned into payload bytes. The standard
//! parameter types are provided by [`StdParamType`].
//!
//! # Example
//!
//! ```
//! use bytewire::base::ByteOrder;
//! use bytewire::tlv::{
//!     Definition, Envelope, Frame, FrameCode, Limits, Protocol,
//!     StdParamType, TlvCodec,
//! };
//!
//! bytewire::tlv_enum! {
//!     =>
//!     pub Ping;
//!
//!     (V1 => 1, "V1")
//! }
//!
//! impl Protocol for Ping {
//!     fn byte_order(self) -> ByteOrder {
//!         ByteOrder::BigEndian
//!     }
//!
//!     fn limits(self) -> Limits {
//!         Limits::new(10, 10, 1024)
//!     }
//! }
//!
//! bytewire::tlv_enum! {
//!     =>
//!     pub PingFrame;
//!
//!     (Ping => 1, "Ping")
//!     (Pong => 2, "Pong")
//! }
//!
//! impl FrameCode for PingFrame {}
//!
//! let codec = TlvCodec::new(
//!     Definition::<Ping, PingFrame, StdParamType>::new()
//! );
//! let envelope = Envelope::new(
//!     Ping::V1,
//!     vec![Frame::empty(PingFrame::Ping)
//!         .with_param(StdParamType::UInt8, 0x12u8)],
//! );
//! let wire = codec.encode(&envelope).unwrap();
//! assert_eq!(wire.as_ref(), b"\x01\x01\x01\x01\x01\x01\x12");
//! assert_eq!(codec.decode(&wire).unwrap(), envelope);
//! ```

pub use self::code::Code;
pub use self::codec::{
    decode, encode, encode_into, Context, DecodeError, DefinedEnvelope,
    EncodeError, ErrorKind, TlvCodec,
};
pub use self::envelope::{Envelope, Frame, Param, Value};
pub use self::protocol::{
    CodeKind, Definition, FrameCode, Limits, ParamType, Protocol,
    ProtocolDefinition, UnknownCode,
};
pub use self::types::{ParamError, StdParamType};

pub mod code;
pub mod codec;
pub mod envelope;
pub mod protocol;
pub mod types;
