mod common;

use bytewire::base::{Buffer, ReadBuffer, ReadError, UInt};
use bytewire::tlv::{
    Code, CodeKind, Definition, Envelope, ErrorKind, Frame, ParamError,
    ParamType, Protocol, StdParamType, TlvCodec, UnknownCode, Value,
};
use common::{init_logging, Ping, PingDefinition, PingFrame};
use rstest::rstest;
use std::error::Error;

type PingEnvelope = Envelope<Ping, PingFrame, StdParamType>;

fn codec() -> TlvCodec<PingDefinition> {
    init_logging();
    TlvCodec::new(PingDefinition::new())
}

fn single(frame: Frame<PingFrame, StdParamType>) -> PingEnvelope {
    Envelope::new(Ping::V1, vec![frame])
}

fn ping() -> Frame<PingFrame, StdParamType> {
    Frame::empty(PingFrame::Ping)
}

fn wire(hex: &str) -> Buffer {
    Buffer::from_encoded(bytewire::base::Encoding::Base16, hex).unwrap()
}

//------------ Layout --------------------------------------------------------

#[rstest]
#[case::null_and_bools(
    single(
        ping()
            .with_param(StdParamType::Null, ())
            .with_param(StdParamType::Bool, false)
            .with_param(StdParamType::Bool, true)
    ),
    "010101030000050100050101"
)]
#[case::string(
    single(ping().with_param(StdParamType::String, "Hi")),
    "010101010600024869"
)]
#[case::integers(
    single(
        ping()
            .with_param(StdParamType::UInt8, 0x12u8)
            .with_param(StdParamType::UInt16, 0x1234u16)
            .with_param(StdParamType::UInt32, 0x12345678u32)
            .with_param(StdParamType::UInt64, 0x1122334455667788u64)
    ),
    "01010104010112020212340304123456780408\
     1122334455667788"
)]
#[case::two_frames(
    Envelope::new(
        Ping::V1,
        vec![
            ping().with_param(StdParamType::UInt8, 1u8),
            Frame::empty(PingFrame::Pong)
                .with_param(StdParamType::UInt8, 2u8),
        ],
    ),
    "0102 0101010101 0201010102"
)]
#[case::empty_frame(single(Frame::empty(PingFrame::Pong)), "01010200")]
fn layout(#[case] envelope: PingEnvelope, #[case] hex: &str) {
    let hex = hex.replace(' ', "");
    let encoded = codec().encode(&envelope).unwrap();
    assert_eq!(encoded.to_base16(), hex);
    assert_eq!(codec().decode(&encoded).unwrap(), envelope);
}

#[test]
fn long_string_uses_two_byte_prefix() {
    let text = vec![b'x'; 300];
    let envelope =
        single(ping().with_param(StdParamType::String, text.clone()));
    let encoded = codec().encode(&envelope).unwrap();
    assert_eq!(encoded.length(), 4 + 3 + 300);
    assert_eq!(encoded.substr(4, Some(3)), b"\x06\x01\x2c");

    let decoded = codec().decode(&encoded).unwrap();
    let (_, frames) = decoded.into_parts();
    assert_eq!(frames[0].params()[0].value().as_bytes(), Some(&text[..]));
}

#[test]
fn zero_length_payloads_decode_to_defaults() {
    let decoded = codec()
        .decode(wire("01010107000001000200030004000500060000"))
        .unwrap();
    let values: Vec<_> = decoded.frames()[0]
        .params()
        .iter()
        .map(|param| param.value().clone())
        .collect();
    assert_eq!(
        values,
        [
            Value::Null,
            Value::UInt(0),
            Value::UInt(0),
            Value::UInt(0),
            Value::UInt(0),
            Value::Bool(false),
            Value::Bytes(Vec::new()),
        ]
    );
}

//------------ Limits --------------------------------------------------------

#[test]
fn frame_count_limits() {
    let too_many = Envelope::new(Ping::V1, vec![ping(); 11]);
    let err = codec().encode(&too_many).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::FramesCount { count: 11, cap: 10 });

    let err = codec().decode(wire("010b")).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::FramesCount { count: 11, cap: 10 });

    let err = codec().decode(wire("0100")).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::FramesCount { count: 0, cap: 10 });
    assert_eq!(
        err.to_string(),
        "[V1] decoding failed: invalid frames count 0 (allowed 1 to 10)"
    );
}

#[test]
fn param_count_limits() {
    let mut frame = ping();
    for _ in 0..11 {
        frame = frame.with_param(StdParamType::Null, ());
    }
    let err = codec().encode(&single(frame)).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ParamsCount { count: 11, cap: 10 });
    assert_eq!(err.context().frame_code(), Some("Ping"));

    let err = codec().decode(wire("0101010b")).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ParamsCount { count: 11, cap: 10 });
    assert_eq!(err.context().unwrap().to_string(), "[V1][Ping]");
}

#[test]
fn payload_length_limits() {
    let envelope =
        single(ping().with_param(StdParamType::String, vec![0u8; 1025]));
    let err = codec().encode(&envelope).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ParamLength { len: 1025, max: 1024 });

    let err = codec().decode(wire("01010101060401")).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ParamLength { len: 1025, max: 1024 });
    assert_eq!(
        err.to_string(),
        "[V1][Ping][Param#0] decoding failed: \
         param length 1025 exceeds maximum allowed 1024"
    );

    let envelope =
        single(ping().with_param(StdParamType::String, vec![0u8; 1024]));
    assert!(codec().encode(&envelope).is_ok());
}

//------------ Errors --------------------------------------------------------

#[test]
fn trailing_bytes_are_rejected() {
    let err = codec().decode(wire("0101010101011200")).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::TrailingBytes { remaining: 1 });
    assert_eq!(
        err.to_string(),
        "[V1] decoding failed: unexpected bytes remaining: 1"
    );
}

#[test]
fn truncated_input() {
    let err = codec().decode(wire("0101010101")).unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::Read(ReadError::Underflow {
            requested: 1,
            available: 0
        })
    );
    assert_eq!(err.context().unwrap().param_index(), Some(0));
}

#[test]
fn unknown_codes() {
    let err = codec().decode(wire("0201")).unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::UnknownCode(UnknownCode::new(CodeKind::Protocol, 2))
    );
    assert!(err.context().is_none());

    let err = codec().decode(wire("01010300")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "[V1][Frame#0] decoding failed: unknown frame code 3"
    );

    let err = codec().decode(wire("0101010109")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "[V1][Ping][Param#0] decoding failed: unknown parameter type code 9"
    );
}

#[test]
fn errors_expose_their_cause() {
    let err = codec().decode(wire("010101010201ff")).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Param(ParamError::Int(_))));
    let source = err.source().unwrap();
    assert!(source.downcast_ref::<ParamError>().is_some());

    let envelope = Envelope::new(
        Ping::V1,
        vec![
            ping(),
            Frame::empty(PingFrame::Pong)
                .with_param(StdParamType::UInt8, 1u8)
                .with_param(StdParamType::String, 7u8),
        ],
    );
    let err = codec().encode(&envelope).unwrap_err();
    assert_eq!(err.context().frame_index(), Some(1));
    assert_eq!(err.context().param_index(), Some(1));
    assert_eq!(
        err.to_string(),
        "[V1][Pong][Param#1] encoding failed: \
         expected value for String, found integer"
    );
    assert_eq!(
        err.source().and_then(|err| err.downcast_ref::<ParamError>()),
        Some(&ParamError::TypeMismatch {
            expected: "String",
            found: "integer"
        })
    );
}

#[test]
fn encode_appends_to_buffer() {
    let envelope = single(ping().with_param(StdParamType::UInt8, 0x12u8));
    let mut target = Buffer::from(b"\xAA".as_slice());
    codec().encode_into(&envelope, &mut target).unwrap();
    assert_eq!(target.to_base16(), "aa01010101010112");

    let decoded = codec().decode(target.substr(1, None)).unwrap();
    assert_eq!(decoded, envelope);

    target.lock();
    assert_eq!(
        codec().encode_into(&envelope, &mut target).unwrap_err().kind(),
        &ErrorKind::ShortBuf
    );
}

//------------ Custom Parameter Types ----------------------------------------

bytewire::tlv_enum! {
    /// Parameters that only accept valid UTF-8.
    =>
    TextParam;

    (Text => 1, "Text")
}

impl TextParam {
    fn check(payload: &[u8]) -> Result<(), ParamError> {
        std::str::from_utf8(payload).map(|_| ()).map_err(|err| {
            ParamError::other(format_args!(
                "invalid UTF-8 after {} bytes",
                err.valid_up_to()
            ))
        })
    }
}

impl ParamType for TextParam {
    fn length_width(self) -> UInt {
        UInt::Bytes2
    }

    fn encode<P: Protocol>(
        self,
        value: &Value,
        _: P,
    ) -> Result<Vec<u8>, ParamError> {
        let payload = value.as_bytes().ok_or(ParamError::TypeMismatch {
            expected: self.name(),
            found: value.kind(),
        })?;
        Self::check(payload)?;
        Ok(payload.to_vec())
    }

    fn decode<P: Protocol>(
        self,
        payload: Option<&[u8]>,
        _: P,
    ) -> Result<Value, ParamError> {
        let payload = payload.unwrap_or_default();
        Self::check(payload)?;
        Ok(Value::Bytes(payload.to_vec()))
    }
}

#[test]
fn custom_param_type_errors() {
    init_logging();
    let codec =
        TlvCodec::new(Definition::<Ping, PingFrame, TextParam>::new());
    let text = |value: Value| {
        Envelope::new(
            Ping::V1,
            vec![Frame::empty(PingFrame::Ping)
                .with_param(TextParam::Text, value)],
        )
    };

    let good = text("ok".into());
    let encoded = codec.encode(&good).unwrap();
    assert_eq!(encoded.to_base16(), "010101010100026f6b");
    assert_eq!(codec.decode(&encoded).unwrap(), good);

    let err = codec.encode(&text(b"a\xff".as_slice().into())).unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::Param(ParamError::Other(
            "invalid UTF-8 after 1 bytes".into()
        ))
    );
    assert_eq!(
        err.to_string(),
        "[V1][Ping][Param#0] encoding failed: invalid UTF-8 after 1 bytes"
    );

    let err = codec.decode(wire("0101010101000261ff")).unwrap_err();
    assert_eq!(
        err.source().and_then(|err| err.downcast_ref::<ParamError>()),
        Some(&ParamError::other("invalid UTF-8 after 1 bytes"))
    );

    assert_eq!(
        codec.encode(&text(1u8.into())).unwrap_err().kind(),
        &ErrorKind::Param(ParamError::TypeMismatch {
            expected: "Text",
            found: "integer"
        })
    );
}
