//! The in-memory form of TLV messages.
//!
//! An [`Envelope`] is the unit of encoding and decoding. It consists of a
//! protocol and a non-empty sequence of [`Frame`]s, each of which holds a
//! sequence of typed [`Param`]s. The values of parameters are represented
//! by the protocol-independent [`Value`].
//!
//! All types are plain values. They are built once, either by the caller
//! before encoding or by the codec when decoding, and only read afterwards.

use core::fmt;

//------------ Envelope ------------------------------------------------------

/// A complete TLV message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Envelope<P, F, T> {
    protocol: P,
    frames: Vec<Frame<F, T>>,
}

impl<P, F, T> Envelope<P, F, T> {
    /// Creates a new envelope.
    ///
    /// The frames are checked against the protocol’s limits only when the
    /// envelope is encoded.
    pub fn new(protocol: P, frames: Vec<Frame<F, T>>) -> Self {
        Envelope { protocol, frames }
    }

    /// Returns the protocol of the envelope.
    pub fn protocol(&self) -> &P {
        &self.protocol
    }

    /// Returns the frames of the envelope.
    pub fn frames(&self) -> &[Frame<F, T>] {
        &self.frames
    }

    /// Converts the envelope into its protocol and frames.
    pub fn into_parts(self) -> (P, Vec<Frame<F, T>>) {
        (self.protocol, self.frames)
    }
}

//------------ Frame ---------------------------------------------------------

/// A group of parameters within an envelope.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Frame<F, T> {
    code: F,
    params: Vec<Param<T>>,
}

impl<F, T> Frame<F, T> {
    /// Creates a new frame.
    pub fn new(code: F, params: Vec<Param<T>>) -> Self {
        Frame { code, params }
    }

    /// Creates a new frame without parameters.
    pub fn empty(code: F) -> Self {
        Self::new(code, Vec::new())
    }

    /// Returns the frame with a parameter added to the end.
    #[must_use]
    pub fn with_param(
        mut self,
        param_type: T,
        value: impl Into<Value>,
    ) -> Self {
        self.params.push(Param::new(param_type, value));
        self
    }

    /// Returns the code of the frame.
    pub fn code(&self) -> &F {
        &self.code
    }

    /// Returns the parameters of the frame.
    pub fn params(&self) -> &[Param<T>] {
        &self.params
    }
}

//------------ Param ---------------------------------------------------------

/// A typed value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Param<T> {
    param_type: T,
    value: Value,
}

impl<T> Param<T> {
    /// Creates a new parameter.
    pub fn new(param_type: T, value: impl Into<Value>) -> Self {
        Param {
            param_type,
            value: value.into(),
        }
    }

    /// Returns the type of the parameter.
    pub fn param_type(&self) -> &T {
        &self.param_type
    }

    /// Returns the value of the parameter.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Converts the parameter into its value.
    pub fn into_value(self) -> Value {
        self.value
    }
}

//------------ Value ---------------------------------------------------------

/// The native value of a parameter.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum Value {
    /// No value.
    #[default]
    Null,

    /// An unsigned integer.
    UInt(u64),

    /// A boolean.
    Bool(bool),

    /// A sequence of bytes, often but not necessarily text.
    Bytes(Vec<u8>),
}

impl Value {
    /// Returns whether the value is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(*self, Value::Null)
    }

    /// Returns the integer if the value is one.
    pub fn as_uint(&self) -> Option<u64> {
        match *self {
            Value::UInt(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the boolean if the value is one.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Bool(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the bytes if the value is a byte sequence.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match *self {
            Value::Bytes(ref value) => Some(value),
            _ => None,
        }
    }

    /// Returns the bytes as a string if they are valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|bytes| core::str::from_utf8(bytes).ok())
    }

    /// Returns a short description of the kind of value.
    pub fn kind(&self) -> &'static str {
        match *self {
            Value::Null => "null",
            Value::UInt(_) => "integer",
            Value::Bool(_) => "boolean",
            Value::Bytes(_) => "bytes",
        }
    }
}

//--- From

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::UInt(value.into())
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Value::UInt(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::UInt(value.into())
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::UInt(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl<'a> From<&'a [u8]> for Value {
    fn from(value: &'a [u8]) -> Self {
        Value::Bytes(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Bytes(value.into_bytes())
    }
}

impl<'a> From<&'a str> for Value {
    fn from(value: &'a str) -> Self {
        Value::Bytes(value.as_bytes().into())
    }
}

impl<V: Into<Value>> From<Option<V>> for Value {
    fn from(value: Option<V>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

//--- Display

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Value::Null => f.write_str("null"),
            Value::UInt(value) => fmt::Display::fmt(&value, f),
            Value::Bool(value) => fmt::Display::fmt(&value, f),
            Value::Bytes(ref value) => match core::str::from_utf8(value) {
                Ok(s) => write!(f, "{:?}", s),
                Err(_) => write!(
                    f,
                    "0x{}",
                    crate::utils::base16::encode_display(value)
                ),
            },
        }
    }
}

//============ Testing =======================================================
