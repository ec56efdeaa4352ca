//! Encoding and decoding of envelopes.
//!
//! # Wire Format
//!
//! An envelope starts with the protocol code and the number of frames,
//! both a single byte. Each frame then starts with its code and the number
//! of its parameters, again a single byte each. Each parameter consists of
//! its type code, a length prefix, and the payload:
//!
//! ```text
//! +----------+--------+
//! | protocol | frames |  then for each frame:
//! +----------+--------+
//! +------+--------+
//! | code | params |      then for each parameter:
//! +------+--------+
//! +------+--------+---------+
//! | type | length | payload |
//! +------+--------+---------+
//! ```
//!
//! The length prefix is one, two, or four bytes wide as determined by the
//! parameter type and packed in the byte order of the protocol. If the
//! length is zero, the payload is absent.
//!
//! There is no length for the envelope as a whole. Decoding therefore
//! insists on consuming its input completely. If the transport can carry
//! more than one envelope, it needs to delimit them itself.
//!
//! # Errors
//!
//! Errors within a frame are reported together with a [`Context`] naming
//! the protocol, the frame, and the parameter where the error happened.
//! The original error is available via [`std::error::Error::source`].

use super::code::Code;
use super::envelope::{Envelope, Frame, Param};
use super::protocol::{
    FrameCode, ParamType, Protocol, ProtocolDefinition, UnknownCode,
};
use super::types::ParamError;
use crate::base::buffer::Buffer;
use crate::base::order::IntError;
use crate::base::reader::{ByteReader, ReadError};
use core::fmt;
use octseq::builder::{OctetsBuilder, ShortBuf};
use tracing::{debug, trace};

//------------ Type Aliases --------------------------------------------------

/// The envelope produced by decoding with a definition.
pub type DefinedEnvelope<D> = Envelope<
    <D as ProtocolDefinition>::Protocol,
    <D as ProtocolDefinition>::FrameCode,
    <D as ProtocolDefinition>::ParamType,
>;

//------------ TlvCodec ------------------------------------------------------

/// A codec for the envelopes of a protocol definition.
#[derive(Clone, Copy, Debug, Default)]
pub struct TlvCodec<D> {
    definition: D,
}

impl<D: ProtocolDefinition> TlvCodec<D> {
    /// Creates a new codec for the given definition.
    pub fn new(definition: D) -> Self {
        TlvCodec { definition }
    }

    /// Returns a reference to the definition.
    pub fn definition(&self) -> &D {
        &self.definition
    }

    /// Encodes an envelope into a new buffer.
    pub fn encode(
        &self,
        envelope: &DefinedEnvelope<D>,
    ) -> Result<Buffer, EncodeError> {
        encode(envelope)
    }

    /// Encodes an envelope and appends it to `target`.
    pub fn encode_into<Target: OctetsBuilder + ?Sized>(
        &self,
        envelope: &DefinedEnvelope<D>,
        target: &mut Target,
    ) -> Result<(), EncodeError> {
        encode_into(envelope, target)
    }

    /// Decodes an envelope.
    pub fn decode(
        &self,
        data: impl AsRef<[u8]>,
    ) -> Result<DefinedEnvelope<D>, DecodeError> {
        decode(&self.definition, data.as_ref())
    }
}

//------------ encode --------------------------------------------------------

/// Encodes an envelope into a new buffer.
pub fn encode<P, F, T>(
    envelope: &Envelope<P, F, T>,
) -> Result<Buffer, EncodeError>
where
    P: Protocol,
    F: FrameCode,
    T: ParamType,
{
    let mut target = Buffer::new();
    encode_into(envelope, &mut target)?;
    Ok(target)
}

/// Encodes an envelope and appends it to `target`.
///
/// If encoding fails, `target` may contain part of the envelope.
pub fn encode_into<P, F, T, Target>(
    envelope: &Envelope<P, F, T>,
    target: &mut Target,
) -> Result<(), EncodeError>
where
    P: Protocol,
    F: FrameCode,
    T: ParamType,
    Target: OctetsBuilder + ?Sized,
{
    let protocol = *envelope.protocol();
    match compose_envelope(envelope, target) {
        Ok(()) => {
            trace!(
                protocol = protocol.name(),
                frames = envelope.frames().len(),
                "encoded TLV envelope"
            );
            Ok(())
        }
        Err(err) => {
            debug!(error = %err, "TLV encoding failed");
            Err(err)
        }
    }
}

fn compose_envelope<P, F, T, Target>(
    envelope: &Envelope<P, F, T>,
    target: &mut Target,
) -> Result<(), EncodeError>
where
    P: Protocol,
    F: FrameCode,
    T: ParamType,
    Target: OctetsBuilder + ?Sized,
{
    let protocol = *envelope.protocol();
    let cap = protocol.frames_cap().min(usize::from(u8::MAX));
    let count = envelope.frames().len();
    let count_byte = u8::try_from(count)
        .ok()
        .filter(|&byte| byte >= 1 && usize::from(byte) <= cap)
        .ok_or_else(|| {
            EncodeError::new(
                Context::protocol(protocol),
                ErrorKind::FramesCount { count, cap },
            )
        })?;
    append(target, &[protocol.to_int(), count_byte])
        .map_err(|kind| EncodeError::new(Context::protocol(protocol), kind))?;

    for (index, frame) in envelope.frames().iter().enumerate() {
        let mut context = Context::frame(protocol, index);
        context.frame_code = Some(frame.code().name());
        compose_frame(frame, protocol, target, &mut context)
            .map_err(|kind| EncodeError::new(context, kind))?;
    }
    Ok(())
}

fn compose_frame<P, F, T, Target>(
    frame: &Frame<F, T>,
    protocol: P,
    target: &mut Target,
    context: &mut Context,
) -> Result<(), ErrorKind>
where
    P: Protocol,
    F: FrameCode,
    T: ParamType,
    Target: OctetsBuilder + ?Sized,
{
    let cap = protocol.params_cap().min(usize::from(u8::MAX));
    let count = frame.params().len();
    let count_byte = u8::try_from(count)
        .ok()
        .filter(|&byte| usize::from(byte) <= cap)
        .ok_or(ErrorKind::ParamsCount { count, cap })?;
    append(target, &[frame.code().to_int(), count_byte])?;

    for (index, param) in frame.params().iter().enumerate() {
        context.param = Some(index);
        compose_param(param, protocol, target)?;
    }
    Ok(())
}

fn compose_param<P, T, Target>(
    param: &Param<T>,
    protocol: P,
    target: &mut Target,
) -> Result<(), ErrorKind>
where
    P: Protocol,
    T: ParamType,
    Target: OctetsBuilder + ?Sized,
{
    let param_type = *param.param_type();
    let payload = param_type.encode(param.value(), protocol)?;
    let max = protocol.max_length();
    if payload.len() > max {
        return Err(ErrorKind::ParamLength {
            len: payload.len(),
            max,
        });
    }
    let width = param_type.length_width();
    let len = protocol.byte_order().pack32(width, payload.len() as u64)?;
    append(target, &[param_type.to_int()])?;
    append(target, &len)?;
    append(target, &payload)
}

fn append<Target: OctetsBuilder + ?Sized>(
    target: &mut Target,
    data: &[u8],
) -> Result<(), ErrorKind> {
    target
        .append_slice(data)
        .map_err(|err| ErrorKind::from(Into::<ShortBuf>::into(err)))
}

//------------ decode --------------------------------------------------------

/// Decodes an envelope using the given definition.
///
/// The data must contain exactly one envelope. Any bytes left after the
/// last frame cause decoding to fail.
pub fn decode<D: ProtocolDefinition>(
    definition: &D,
    data: &[u8],
) -> Result<DefinedEnvelope<D>, DecodeError> {
    match parse_envelope(definition, data) {
        Ok(envelope) => {
            trace!(
                protocol = envelope.protocol().name(),
                frames = envelope.frames().len(),
                len = data.len(),
                "decoded TLV envelope"
            );
            Ok(envelope)
        }
        Err(err) => {
            debug!(error = %err, len = data.len(), "TLV decoding failed");
            Err(err)
        }
    }
}

fn parse_envelope<D: ProtocolDefinition>(
    definition: &D,
    data: &[u8],
) -> Result<DefinedEnvelope<D>, DecodeError> {
    let mut reader = ByteReader::new(data);
    let code = reader.read_u8().map_err(DecodeError::without_context)?;
    let protocol = definition
        .resolve_protocol(code)
        .map_err(DecodeError::without_context)?;
    let with_protocol =
        |kind: ErrorKind| DecodeError::new(Context::protocol(protocol), kind);

    let count = reader
        .read_u8()
        .map_err(|err| with_protocol(err.into()))?;
    let count = usize::from(count);
    let cap = protocol.frames_cap();
    if count < 1 || count > cap {
        return Err(with_protocol(ErrorKind::FramesCount { count, cap }));
    }

    let mut frames = Vec::with_capacity(count);
    for index in 0..count {
        let mut context = Context::frame(protocol, index);
        let frame =
            parse_frame(definition, protocol, &mut reader, &mut context)
                .map_err(|kind| DecodeError::new(context, kind))?;
        frames.push(frame);
    }

    if !reader.is_end() {
        return Err(with_protocol(ErrorKind::TrailingBytes {
            remaining: reader.remaining(),
        }));
    }
    Ok(Envelope::new(protocol, frames))
}

fn parse_frame<D: ProtocolDefinition>(
    definition: &D,
    protocol: D::Protocol,
    reader: &mut ByteReader,
    context: &mut Context,
) -> Result<Frame<D::FrameCode, D::ParamType>, ErrorKind> {
    let code = definition.resolve_frame_code(reader.read_u8()?)?;
    context.frame_code = Some(code.name());
    let count = usize::from(reader.read_u8()?);
    let cap = protocol.params_cap();
    if count > cap {
        return Err(ErrorKind::ParamsCount { count, cap });
    }

    let mut params = Vec::with_capacity(count);
    for index in 0..count {
        context.param = Some(index);
        let param_type = definition.resolve_param_type(reader.read_u8()?)?;
        let width = param_type.length_width();
        let len = protocol
            .byte_order()
            .unpack32(reader.next(width.size())?, width)?;
        let max = protocol.max_length();
        let len = usize::try_from(len).unwrap_or(usize::MAX);
        if len > max {
            return Err(ErrorKind::ParamLength { len, max });
        }
        let payload = if len > 0 { Some(reader.next(len)?) } else { None };
        let value = param_type.decode(payload, protocol)?;
        params.push(Param::new(param_type, value));
    }
    Ok(Frame::new(code, params))
}

//============ Error Types ===================================================

//------------ Context -------------------------------------------------------

/// The position within an envelope where an error happened.
///
/// When displayed, the context is rendered as a sequence of bracketed
/// names such as `[V1][Ping][Param#1]`. Frames whose code is not yet known
/// are shown by their index, e.g., `[Frame#0]`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Context {
    protocol: &'static str,
    frame: Option<usize>,
    frame_code: Option<&'static str>,
    param: Option<usize>,
}

impl Context {
    fn protocol(protocol: impl Code) -> Self {
        Context {
            protocol: protocol.name(),
            frame: None,
            frame_code: None,
            param: None,
        }
    }

    fn frame(protocol: impl Code, index: usize) -> Self {
        Context {
            frame: Some(index),
            ..Self::protocol(protocol)
        }
    }

    /// Returns the name of the protocol.
    pub fn protocol_name(&self) -> &'static str {
        self.protocol
    }

    /// Returns the index of the frame if the error happened in one.
    pub fn frame_index(&self) -> Option<usize> {
        self.frame
    }

    /// Returns the name of the frame’s code if it was known.
    pub fn frame_code(&self) -> Option<&'static str> {
        self.frame_code
    }

    /// Returns the index of the parameter if the error happened in one.
    pub fn param_index(&self) -> Option<usize> {
        self.param
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}]", self.protocol)?;
        match (self.frame_code, self.frame) {
            (Some(code), _) => write!(f, "[{}]", code)?,
            (None, Some(index)) => write!(f, "[Frame#{}]", index)?,
            (None, None) => {}
        }
        if let Some(param) = self.param {
            write!(f, "[Param#{}]", param)?;
        }
        Ok(())
    }
}

//------------ ErrorKind -----------------------------------------------------

/// The reason encoding or decoding failed.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The number of frames was zero or above the protocol’s cap.
    FramesCount { count: usize, cap: usize },

    /// The number of parameters in a frame was above the protocol’s cap.
    ParamsCount { count: usize, cap: usize },

    /// A parameter’s payload was longer than the protocol allows.
    ParamLength { len: usize, max: usize },

    /// A wire code could not be resolved.
    UnknownCode(UnknownCode),

    /// The data ended prematurely.
    Read(ReadError),

    /// A length prefix could not be packed or unpacked.
    Int(IntError),

    /// A parameter’s value could not be encoded or decoded.
    Param(ParamError),

    /// Data was left after the last frame.
    TrailingBytes { remaining: usize },

    /// The target buffer was too short.
    ShortBuf,
}

impl From<UnknownCode> for ErrorKind {
    fn from(err: UnknownCode) -> Self {
        ErrorKind::UnknownCode(err)
    }
}

impl From<ReadError> for ErrorKind {
    fn from(err: ReadError) -> Self {
        ErrorKind::Read(err)
    }
}

impl From<IntError> for ErrorKind {
    fn from(err: IntError) -> Self {
        ErrorKind::Int(err)
    }
}

impl From<ParamError> for ErrorKind {
    fn from(err: ParamError) -> Self {
        ErrorKind::Param(err)
    }
}

impl From<ShortBuf> for ErrorKind {
    fn from(_: ShortBuf) -> Self {
        ErrorKind::ShortBuf
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ErrorKind::FramesCount { count, cap } => {
                write!(f, "invalid frames count {count} (allowed 1 to {cap})")
            }
            ErrorKind::ParamsCount { count, cap } => {
                write!(f, "invalid params count {count} (allowed 0 to {cap})")
            }
            ErrorKind::ParamLength { len, max } => write!(
                f,
                "param length {len} exceeds maximum allowed {max}"
            ),
            ErrorKind::UnknownCode(ref err) => fmt::Display::fmt(err, f),
            ErrorKind::Read(ref err) => fmt::Display::fmt(err, f),
            ErrorKind::Int(ref err) => fmt::Display::fmt(err, f),
            ErrorKind::Param(ref err) => fmt::Display::fmt(err, f),
            ErrorKind::TrailingBytes { remaining } => {
                write!(f, "unexpected bytes remaining: {remaining}")
            }
            ErrorKind::ShortBuf => f.write_str("buffer too short"),
        }
    }
}

impl ErrorKind {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            ErrorKind::UnknownCode(ref err) => Some(err),
            ErrorKind::Read(ref err) => Some(err),
            ErrorKind::Int(ref err) => Some(err),
            ErrorKind::Param(ref err) => Some(err),
            _ => None,
        }
    }
}

//------------ EncodeError ---------------------------------------------------

/// Encoding an envelope failed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EncodeError {
    context: Context,
    kind: ErrorKind,
}

impl EncodeError {
    fn new(context: Context, kind: ErrorKind) -> Self {
        EncodeError { context, kind }
    }

    /// Returns where in the envelope the error happened.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Returns the reason for the error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} encoding failed: {}", self.context, self.kind)
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

//------------ DecodeError ---------------------------------------------------

/// Decoding an envelope failed.
///
/// Errors that happen before the protocol is known carry no context.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodeError {
    context: Option<Context>,
    kind: ErrorKind,
}

impl DecodeError {
    fn new(context: Context, kind: ErrorKind) -> Self {
        DecodeError {
            context: Some(context),
            kind,
        }
    }

    fn without_context(kind: impl Into<ErrorKind>) -> Self {
        DecodeError {
            context: None,
            kind: kind.into(),
        }
    }

    /// Returns where in the envelope the error happened if known.
    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }

    /// Returns the reason for the error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.context {
            Some(ref context) => {
                write!(f, "{} decoding failed: {}", context, self.kind)
            }
            None => write!(f, "decoding failed: {}", self.kind),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

//============ Testing =======================================================
