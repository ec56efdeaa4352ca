//! The standard parameter types.

use super::envelope::Value;
use super::protocol::{ParamType, Protocol};
use crate::base::order::{ByteOrder, IntError, UInt};
use core::fmt;

//------------ StdParamType --------------------------------------------------

crate::tlv_enum! {
    /// The standard set of parameter types.
    ///
    /// Integers are packed in the byte order of the protocol with the
    /// exception of [`UInt64`][Self::UInt64] which always uses network
    /// byte order. Strings can be up to 65535 bytes long and need not be
    /// valid UTF-8. All other types use a single byte length prefix.
    ///
    /// A zero-length payload decodes to a default value: null for
    /// [`Null`][Self::Null], an empty byte sequence for
    /// [`String`][Self::String], false for [`Bool`][Self::Bool], and zero
    /// for the integer types.
    =>
    pub StdParamType;

    /// Always [`Value::Null`] with an empty payload.
    (Null => 0, "Null")

    /// An 8 bit unsigned integer.
    (UInt8 => 1, "UInt8")

    /// A 16 bit unsigned integer.
    (UInt16 => 2, "UInt16")

    /// A 32 bit unsigned integer.
    (UInt32 => 3, "UInt32")

    /// A 64 bit unsigned integer.
    (UInt64 => 4, "UInt64")

    /// A boolean encoded as a single byte of `0x00` or `0x01`.
    (Bool => 5, "Bool")

    /// A sequence of bytes.
    (String => 6, "String")
}

impl StdParamType {
    /// Returns the width of an integer type.
    fn int_width(self) -> Option<UInt> {
        match self {
            StdParamType::UInt8 => Some(UInt::Byte),
            StdParamType::UInt16 => Some(UInt::Bytes2),
            StdParamType::UInt32 => Some(UInt::Bytes4),
            StdParamType::UInt64 => Some(UInt::Bytes8),
            _ => None,
        }
    }

    /// Returns the byte order used for integers of this type.
    fn int_order<P: Protocol>(self, protocol: P) -> ByteOrder {
        match self {
            StdParamType::UInt64 => ByteOrder::BigEndian,
            _ => protocol.byte_order(),
        }
    }

    fn mismatch(self, value: &Value) -> ParamError {
        ParamError::TypeMismatch {
            expected: self.name(),
            found: value.kind(),
        }
    }
}

impl ParamType for StdParamType {
    fn length_width(self) -> UInt {
        match self {
            StdParamType::String => UInt::Bytes2,
            _ => UInt::Byte,
        }
    }

    fn encode<P: Protocol>(
        self,
        value: &Value,
        protocol: P,
    ) -> Result<Vec<u8>, ParamError> {
        match (self, value) {
            (StdParamType::Null, Value::Null) => Ok(Vec::new()),
            (StdParamType::Bool, Value::Bool(value)) => {
                Ok(vec![u8::from(*value)])
            }
            (StdParamType::String, Value::Bytes(value)) => Ok(value.clone()),
            (_, Value::UInt(value)) => match self.int_width() {
                Some(width) => self
                    .int_order(protocol)
                    .pack64(width, *value)
                    .map_err(Into::into),
                None => Err(self.mismatch(&Value::UInt(*value))),
            },
            (_, value) => Err(self.mismatch(value)),
        }
    }

    fn decode<P: Protocol>(
        self,
        payload: Option<&[u8]>,
        protocol: P,
    ) -> Result<Value, ParamError> {
        let payload = match payload {
            Some(payload) if !payload.is_empty() => payload,
            _ => {
                return Ok(match self {
                    StdParamType::Null => Value::Null,
                    StdParamType::String => Value::Bytes(Vec::new()),
                    StdParamType::Bool => Value::Bool(false),
                    _ => Value::UInt(0),
                })
            }
        };
        match self {
            StdParamType::Null => Err(ParamError::Length {
                expected: 0,
                actual: payload.len(),
            }),
            StdParamType::Bool => Ok(Value::Bool(payload != [0])),
            StdParamType::String => Ok(Value::Bytes(payload.to_vec())),
            _ => {
                // Only the integer types are left.
                let width = self.int_width().unwrap_or(UInt::Bytes8);
                self.int_order(protocol)
                    .unpack(payload, width)
                    .map(Value::UInt)
                    .map_err(Into::into)
            }
        }
    }
}

//============ Error Types ===================================================

//------------ ParamError ----------------------------------------------------

/// A parameter value could not be encoded or decoded.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParamError {
    /// The value does not match the parameter type.
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// An integer does not fit or had the wrong number of bytes.
    Int(IntError),

    /// The payload had the wrong length.
    Length { expected: usize, actual: usize },

    /// Some other error.
    Other(String),
}

impl ParamError {
    /// Creates an error with a custom message.
    pub fn other(msg: impl fmt::Display) -> Self {
        ParamError::Other(msg.to_string())
    }
}

//--- From

impl From<IntError> for ParamError {
    fn from(err: IntError) -> Self {
        ParamError::Int(err)
    }
}

//--- Display and Error

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ParamError::TypeMismatch { expected, found } => {
                write!(f, "expected value for {expected}, found {found}")
            }
            ParamError::Int(ref err) => fmt::Display::fmt(err, f),
            ParamError::Length { expected, actual } => {
                write!(
                    f,
                    "expected {expected} bytes of payload, got {actual}"
                )
            }
            ParamError::Other(ref msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ParamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            ParamError::Int(ref err) => Some(err),
            _ => None,
        }
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::tlv::protocol::Limits;
    use rstest::rstest;

    crate::tlv_enum! {
        =>
        Order;

        (Big => 1, "Big")
        (Little => 2, "Little")
    }

    impl Protocol for Order {
        fn byte_order(self) -> ByteOrder {
            match self {
                Order::Big => ByteOrder::BigEndian,
                Order::Little => ByteOrder::LittleEndian,
            }
        }

        fn limits(self) -> Limits {
            Limits::default()
        }
    }

    #[rstest]
    #[case(StdParamType::UInt8, 0x12, Order::Big, b"\x12")]
    #[case(StdParamType::UInt16, 0x1234, Order::Big, b"\x12\x34")]
    #[case(StdParamType::UInt16, 0x1234, Order::Little, b"\x34\x12")]
    #[case(StdParamType::UInt32, 0x12345678, Order::Big, b"\x12\x34\x56\x78")]
    #[case(
        StdParamType::UInt32,
        0x12345678,
        Order::Little,
        b"\x78\x56\x34\x12"
    )]
    #[case(
        StdParamType::UInt64,
        0x1122334455667788,
        Order::Little,
        b"\x11\x22\x33\x44\x55\x66\x77\x88"
    )]
    fn integers(
        #[case] param_type: StdParamType,
        #[case] value: u64,
        #[case] order: Order,
        #[case] wire: &[u8],
    ) {
        assert_eq!(
            param_type.encode(&Value::UInt(value), order).unwrap(),
            wire
        );
        assert_eq!(
            param_type.decode(Some(wire), order).unwrap(),
            Value::UInt(value)
        );
    }

    #[test]
    fn integer_overflow() {
        assert_eq!(
            StdParamType::UInt8.encode(&Value::UInt(256), Order::Big),
            Err(ParamError::Int(IntError::Overflow {
                width: UInt::Byte,
                value: 256
            }))
        );
        assert!(StdParamType::UInt16
            .encode(&Value::UInt(0x10000), Order::Big)
            .is_err());
        assert!(StdParamType::UInt16
            .decode(Some(b"\x01"), Order::Big)
            .is_err());
    }

    #[test]
    fn defaults() {
        use StdParamType::*;

        assert_eq!(Null.decode(None, Order::Big).unwrap(), Value::Null);
        assert_eq!(
            String.decode(Some(b""), Order::Big).unwrap(),
            Value::Bytes(Vec::new())
        );
        assert_eq!(
            Bool.decode(None, Order::Big).unwrap(),
            Value::Bool(false)
        );
        for int in [UInt8, UInt16, UInt32, UInt64] {
            assert_eq!(int.decode(None, Order::Big).unwrap(), Value::UInt(0));
        }
    }

    #[test]
    fn bool_and_null() {
        let order = Order::Little;
        let param = StdParamType::Bool;
        assert_eq!(param.encode(&Value::Bool(true), order).unwrap(), b"\x01");
        assert_eq!(
            param.encode(&Value::Bool(false), order).unwrap(),
            b"\x00"
        );
        assert_eq!(
            param.decode(Some(b"\x00"), order).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            param.decode(Some(b"\x02"), order).unwrap(),
            Value::Bool(true)
        );
        assert!(StdParamType::Null
            .encode(&Value::Null, order)
            .unwrap()
            .is_empty());
        assert!(StdParamType::Null.decode(Some(b"\x00"), order).is_err());
    }

    #[test]
    fn mismatch() {
        let err = StdParamType::Bool
            .encode(&Value::UInt(1), Order::Big)
            .unwrap_err();
        assert_eq!(
            err,
            ParamError::TypeMismatch {
                expected: "Bool",
                found: "integer"
            }
        );
        assert_eq!(err.to_string(), "expected value for Bool, found integer");
        assert!(StdParamType::String
            .encode(&Value::Null, Order::Big)
            .is_err());
        assert!(StdParamType::Null
            .encode(&Value::from("x"), Order::Big)
            .is_err());
    }

    #[test]
    fn length_width() {
        assert_eq!(StdParamType::String.length_width(), UInt::Bytes2);
        assert_eq!(StdParamType::UInt64.length_width(), UInt::Byte);
        assert_eq!(StdParamType::Null.length_width(), UInt::Byte);
    }
}
