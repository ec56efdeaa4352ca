//! Protocols and their definitions.
//!
//! The codec itself knows nothing about concrete protocols. Instead, it is
//! generic over a [`ProtocolDefinition`] which maps the codes read from the
//! wire to three closed sets of values:
//!
//! * a [`Protocol`] publishing the byte order and the [`Limits`] of the
//!   wire format,
//! * a [`FrameCode`] naming the kind of a frame, and
//! * a [`ParamType`] knowing how to encode and decode parameter values.
//!
//! Most definitions simply resolve codes through [`Code::from_int`]. The
//! [`Definition`] type does exactly that for any three types.

use super::code::Code;
use super::envelope::Value;
use super::types::ParamError;
use crate::base::order::{ByteOrder, UInt};
use crate::utils::config::DefMinMax;
use core::fmt;
use core::marker::PhantomData;

//------------ Protocol ------------------------------------------------------

/// A protocol spoken over the TLV wire format.
pub trait Protocol: Code {
    /// Returns the byte order of the multi-byte integers of the protocol.
    fn byte_order(self) -> ByteOrder;

    /// Returns the limits of the protocol.
    fn limits(self) -> Limits;

    /// Returns the maximum number of frames in an envelope.
    fn frames_cap(self) -> usize {
        self.limits().frames_cap()
    }

    /// Returns the maximum number of parameters in a frame.
    fn params_cap(self) -> usize {
        self.limits().params_cap()
    }

    /// Returns the maximum length of a parameter’s payload.
    fn max_length(self) -> usize {
        self.limits().max_length()
    }
}

//------------ FrameCode -----------------------------------------------------

/// The kind of a frame.
pub trait FrameCode: Code {}

//------------ ParamType -----------------------------------------------------

/// The type of a parameter.
///
/// A parameter type determines how a [`Value`] is represented on the wire
/// and how wide the length prefix preceding that representation is.
pub trait ParamType: Code {
    /// Returns the width of the length prefix.
    fn length_width(self) -> UInt;

    /// Encodes a value into its payload.
    fn encode<P: Protocol>(
        self,
        value: &Value,
        protocol: P,
    ) -> Result<Vec<u8>, ParamError>;

    /// Decodes a value from its payload.
    ///
    /// The payload is `None` if the length prefix was zero.
    fn decode<P: Protocol>(
        self,
        payload: Option<&[u8]>,
        protocol: P,
    ) -> Result<Value, ParamError>;
}

//------------ ProtocolDefinition --------------------------------------------

/// A resolver from wire codes to protocol values.
pub trait ProtocolDefinition {
    /// The type of the protocols.
    type Protocol: Protocol;

    /// The type of the frame codes.
    type FrameCode: FrameCode;

    /// The type of the parameter types.
    type ParamType: ParamType;

    /// Resolves the protocol code at the start of an envelope.
    fn resolve_protocol(&self, code: u8)
        -> Result<Self::Protocol, UnknownCode>;

    /// Resolves the code of a frame.
    fn resolve_frame_code(
        &self,
        code: u8,
    ) -> Result<Self::FrameCode, UnknownCode>;

    /// Resolves the type code of a parameter.
    fn resolve_param_type(
        &self,
        code: u8,
    ) -> Result<Self::ParamType, UnknownCode>;
}

impl<'a, D: ProtocolDefinition + ?Sized> ProtocolDefinition for &'a D {
    type Protocol = D::Protocol;
    type FrameCode = D::FrameCode;
    type ParamType = D::ParamType;

    fn resolve_protocol(
        &self,
        code: u8,
    ) -> Result<Self::Protocol, UnknownCode> {
        (**self).resolve_protocol(code)
    }

    fn resolve_frame_code(
        &self,
        code: u8,
    ) -> Result<Self::FrameCode, UnknownCode> {
        (**self).resolve_frame_code(code)
    }

    fn resolve_param_type(
        &self,
        code: u8,
    ) -> Result<Self::ParamType, UnknownCode> {
        (**self).resolve_param_type(code)
    }
}

//------------ Definition ----------------------------------------------------

/// A protocol definition resolving codes via [`Code::from_int`].
pub struct Definition<P, F, T> {
    marker: PhantomData<fn() -> (P, F, T)>,
}

impl<P, F, T> Definition<P, F, T> {
    /// Creates a new definition.
    #[must_use]
    pub const fn new() -> Self {
        Definition {
            marker: PhantomData,
        }
    }
}

impl<P, F, T> Default for Definition<P, F, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, F, T> Clone for Definition<P, F, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P, F, T> Copy for Definition<P, F, T> {}

impl<P, F, T> fmt::Debug for Definition<P, F, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Definition")
    }
}

impl<P, F, T> ProtocolDefinition for Definition<P, F, T>
where
    P: Protocol,
    F: FrameCode,
    T: ParamType,
{
    type Protocol = P;
    type FrameCode = F;
    type ParamType = T;

    fn resolve_protocol(&self, code: u8) -> Result<P, UnknownCode> {
        P::from_int(code).ok_or(UnknownCode::new(CodeKind::Protocol, code))
    }

    fn resolve_frame_code(&self, code: u8) -> Result<F, UnknownCode> {
        F::from_int(code).ok_or(UnknownCode::new(CodeKind::FrameCode, code))
    }

    fn resolve_param_type(&self, code: u8) -> Result<T, UnknownCode> {
        T::from_int(code).ok_or(UnknownCode::new(CodeKind::ParamType, code))
    }
}

//------------ Limits --------------------------------------------------------

/// Configuration for the number of frames in an envelope.
const FRAMES_CAP: DefMinMax<usize> = DefMinMax::new(255, 1, 255);

/// Configuration for the number of parameters in a frame.
const PARAMS_CAP: DefMinMax<usize> = DefMinMax::new(255, 0, 255);

/// Configuration for the length of a parameter’s payload.
const MAX_LENGTH: DefMinMax<u32> = DefMinMax::new(0xFFFF, 0, u32::MAX);

/// The size limits of a protocol.
///
/// Both counts are carried on the wire in a single byte, so the caps can
/// never exceed 255. Setting a value outside the permitted range silently
/// clamps it into that range.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Limits {
    /// The maximum number of frames in an envelope.
    ///
    /// An envelope always has at least one frame.
    frames_cap: usize,

    /// The maximum number of parameters in a frame.
    params_cap: usize,

    /// The maximum length of a parameter’s payload.
    max_length: u32,
}

impl Limits {
    /// Creates limits with the given values after clamping them.
    #[must_use]
    pub fn new(
        frames_cap: usize,
        params_cap: usize,
        max_length: u32,
    ) -> Self {
        Limits {
            frames_cap: FRAMES_CAP.limit(frames_cap),
            params_cap: PARAMS_CAP.limit(params_cap),
            max_length: MAX_LENGTH.limit(max_length),
        }
    }

    /// Returns the maximum number of frames in an envelope.
    pub fn frames_cap(&self) -> usize {
        self.frames_cap
    }

    /// Sets the maximum number of frames in an envelope.
    pub fn set_frames_cap(&mut self, value: usize) {
        self.frames_cap = FRAMES_CAP.limit(value)
    }

    /// Returns the maximum number of parameters in a frame.
    pub fn params_cap(&self) -> usize {
        self.params_cap
    }

    /// Sets the maximum number of parameters in a frame.
    pub fn set_params_cap(&mut self, value: usize) {
        self.params_cap = PARAMS_CAP.limit(value)
    }

    /// Returns the maximum length of a parameter’s payload.
    pub fn max_length(&self) -> usize {
        // u32 always fits on supported platforms.
        self.max_length as usize
    }

    /// Sets the maximum length of a parameter’s payload.
    pub fn set_max_length(&mut self, value: u32) {
        self.max_length = MAX_LENGTH.limit(value)
    }

    /// Returns the limits with the frames cap replaced.
    #[must_use]
    pub fn with_frames_cap(mut self, value: usize) -> Self {
        self.set_frames_cap(value);
        self
    }

    /// Returns the limits with the params cap replaced.
    #[must_use]
    pub fn with_params_cap(mut self, value: usize) -> Self {
        self.set_params_cap(value);
        self
    }

    /// Returns the limits with the maximum length replaced.
    #[must_use]
    pub fn with_max_length(mut self, value: u32) -> Self {
        self.set_max_length(value);
        self
    }
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            frames_cap: FRAMES_CAP.default(),
            params_cap: PARAMS_CAP.default(),
            max_length: MAX_LENGTH.default(),
        }
    }
}

//============ Error Types ===================================================

//------------ CodeKind ------------------------------------------------------

/// The kind of a wire code.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CodeKind {
    Protocol,
    FrameCode,
    ParamType,
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            CodeKind::Protocol => "protocol",
            CodeKind::FrameCode => "frame",
            CodeKind::ParamType => "parameter type",
        })
    }
}

//------------ UnknownCode ---------------------------------------------------

/// A wire code could not be resolved.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UnknownCode {
    kind: CodeKind,
    code: u8,
}

impl UnknownCode {
    /// Creates a new error for the given kind and code.
    #[must_use]
    pub const fn new(kind: CodeKind, code: u8) -> Self {
        UnknownCode { kind, code }
    }

    /// Returns the kind of code that was unknown.
    pub fn kind(&self) -> CodeKind {
        self.kind
    }

    /// Returns the unknown code.
    pub fn code(&self) -> u8 {
        self.code
    }
}

impl fmt::Display for UnknownCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown {} code {}", self.kind, self.code)
    }
}

impl std::error::Error for UnknownCode {}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::tlv::types::StdParamType;

    crate::tlv_enum! {
        =>
        Proto;

        (One => 1, "One")
    }

    impl Protocol for Proto {
        fn byte_order(self) -> ByteOrder {
            ByteOrder::LittleEndian
        }

        fn limits(self) -> Limits {
            Limits::new(3, 4, 100)
        }
    }

    crate::tlv_enum! {
        =>
        Kind;

        (Hello => 9, "Hello")
    }

    impl FrameCode for Kind {}

    type Def = Definition<Proto, Kind, StdParamType>;

    #[test]
    fn limits_clamp() {
        assert_eq!(Limits::default().frames_cap(), 255);
        assert_eq!(Limits::default().params_cap(), 255);
        assert_eq!(Limits::default().max_length(), 0xFFFF);

        let limits = Limits::new(0, 1000, 10);
        assert_eq!(limits.frames_cap(), 1);
        assert_eq!(limits.params_cap(), 255);
        assert_eq!(limits.max_length(), 10);

        let limits = limits.with_frames_cap(300).with_params_cap(0);
        assert_eq!(limits.frames_cap(), 255);
        assert_eq!(limits.params_cap(), 0);
    }

    #[test]
    fn protocol_defaults_use_limits() {
        assert_eq!(Proto::One.frames_cap(), 3);
        assert_eq!(Proto::One.params_cap(), 4);
        assert_eq!(Proto::One.max_length(), 100);
    }

    #[test]
    fn resolve() {
        let def = Def::new();
        assert_eq!(def.resolve_protocol(1), Ok(Proto::One));
        assert_eq!(def.resolve_frame_code(9), Ok(Kind::Hello));
        assert_eq!(def.resolve_param_type(6), Ok(StdParamType::String));
        let err = def.resolve_protocol(2).unwrap_err();
        assert_eq!(err.kind(), CodeKind::Protocol);
        assert_eq!(err.code(), 2);
        assert_eq!(err.to_string(), "unknown protocol code 2");
        assert_eq!(
            (&def).resolve_frame_code(1).unwrap_err(),
            UnknownCode::new(CodeKind::FrameCode, 1)
        );
        assert!(def.resolve_param_type(7).is_err());
    }
}
