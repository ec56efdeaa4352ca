//! Decoding and encoding of Base 64.
//!
//! The Base 64 encoding is defined in [RFC 4648]. There are two variants
//! defined in the RFC, dubbed *base64* and *base64url* which are
//! differenciated by the last two characters in the alphabet. Both are
//! supported here. The *base64url* variant is produced without padding.
//!
//! The module defines the type [`Decoder`] which keeps the state necessary
//! for decoding. The convenience functions use such a decoder to decode
//! complete strings.
//!
//! [RFC 4648]: https://tools.ietf.org/html/rfc4648

use core::fmt;

//------------ Convenience Functions -----------------------------------------

/// Decodes a string with padded *base64* encoded data.
pub fn decode(s: &str) -> Result<Vec<u8>, DecodeError> {
    let mut decoder = Decoder::new();
    for ch in s.chars() {
        decoder.push(ch)?;
    }
    decoder.finalize()
}

/// Decodes a string with either *base64* or *base64url* encoded data.
///
/// Characters of the URL-safe alphabet are translated and missing padding
/// is added before decoding.
pub fn decode_lenient(s: &str) -> Result<Vec<u8>, DecodeError> {
    let mut decoder = Decoder::new();
    let mut count = 0;
    for ch in s.chars() {
        decoder.push(match ch {
            '-' => '+',
            '_' => '/',
            ch => ch,
        })?;
        count += 1;
    }
    if !s.ends_with(PAD) {
        for _ in 0..(4 - count % 4) % 4 {
            decoder.push(PAD)?;
        }
    }
    decoder.finalize()
}

/// Encodes binary data in *base64* and writes it into a format stream.
///
/// This function is intended to be used in implementations of formatting
/// traits:
///
/// ```
/// use core::fmt;
/// use bytewire::utils::base64;
///
/// struct Foo<'a>(&'a [u8]);
///
/// impl<'a> fmt::Display for Foo<'a> {
///     fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
///         base64::display(&self.0, f)
///     }
/// }
/// ```
pub fn display<B, W>(bytes: &B, f: &mut W) -> fmt::Result
where
    B: AsRef<[u8]> + ?Sized,
    W: fmt::Write,
{
    for ch in encoded_chars(bytes.as_ref(), STANDARD_ALPHABET, true) {
        f.write_char(ch)?;
    }
    Ok(())
}

/// Encodes binary data in *base64* and returns the encoded data as a string.
pub fn encode_string<B: AsRef<[u8]> + ?Sized>(bytes: &B) -> String {
    encoded_chars(bytes.as_ref(), STANDARD_ALPHABET, true).collect()
}

/// Encodes binary data in unpadded *base64url* and returns it as a string.
pub fn encode_string_url<B: AsRef<[u8]> + ?Sized>(bytes: &B) -> String {
    encoded_chars(bytes.as_ref(), URL_ALPHABET, false).collect()
}

/// Returns the characters encoding `bytes` with the given alphabet.
fn encoded_chars<'a>(
    bytes: &'a [u8],
    alphabet: &'a [u8; 64],
    pad: bool,
) -> impl Iterator<Item = char> + 'a {
    let ch = move |i: u8| char::from(alphabet[usize::from(i & 0x3F)]);
    let pad = if pad { Some(PAD) } else { None };
    bytes.chunks(3).flat_map(move |chunk| {
        let b0 = chunk[0];
        let b1 = chunk.get(1).copied().unwrap_or(0);
        let b2 = chunk.get(2).copied().unwrap_or(0);
        [
            Some(ch(b0 >> 2)),
            Some(ch((b0 & 0x03) << 4 | b1 >> 4)),
            if chunk.len() > 1 {
                Some(ch((b1 & 0x0F) << 2 | b2 >> 6))
            } else {
                pad
            },
            if chunk.len() > 2 { Some(ch(b2)) } else { pad },
        ]
        .into_iter()
        .flatten()
    })
}

//------------ Decoder -------------------------------------------------------

/// A base 64 decoder.
///
/// This type keeps all the state for decoding a sequence of characters
/// representing data encoded in base 64. Upon success, the decoder returns
/// the decoded data as a vec.
#[derive(Clone, Debug)]
pub struct Decoder {
    /// A buffer for up to four characters.
    buf: [u8; 4],

    /// The index in `buf` where we place the next character.
    ///
    /// We also abuse this to mark when we are done (because there was
    /// padding, in which case we set it to 0xF0).
    next: usize,

    /// The target or an error if something went wrong.
    target: Result<Vec<u8>, DecodeError>,
}

impl Decoder {
    /// Creates a new empty decoder.
    #[must_use]
    pub fn new() -> Self {
        Decoder {
            buf: [0; 4],
            next: 0,
            target: Ok(Vec::new()),
        }
    }

    /// Finalizes decoding and returns the decoded data.
    pub fn finalize(self) -> Result<Vec<u8>, DecodeError> {
        let (target, next) = (self.target, self.next);
        target.and_then(|bytes| {
            // next is either 0 or 0xF0 for a completed group.
            if next & 0x0F != 0 {
                Err(DecodeError::ShortInput)
            } else {
                Ok(bytes)
            }
        })
    }

    /// Decodes one more character of data.
    ///
    /// Returns an error as soon as the encoded data is determined to be
    /// illegal. It is okay to push more data after the first error. The
    /// method will just keep returning errors.
    pub fn push(&mut self, ch: char) -> Result<(), DecodeError> {
        if let Err(err) = self.target {
            return Err(err);
        }
        if self.next == 0xF0 {
            return self.fail(DecodeError::TrailingInput);
        }

        let val = if ch == PAD {
            // Only up to two padding characters possible.
            if self.next < 2 {
                return self.fail(DecodeError::IllegalChar(ch));
            }
            0x80 // Acts as a marker later on.
        } else {
            match decode_char(ch) {
                Some(val) => val,
                None => return self.fail(DecodeError::IllegalChar(ch)),
            }
        };
        self.buf[self.next] = val;
        self.next += 1;

        if self.next == 4 {
            let buf = self.buf;
            if buf[2] == 0x80 && buf[3] != 0x80 {
                return self.fail(DecodeError::TrailingInput);
            }
            let target = match self.target.as_mut() {
                Ok(target) => target,
                Err(err) => return Err(*err),
            };
            target.push(buf[0] << 2 | buf[1] >> 4);
            if buf[2] != 0x80 {
                target.push(buf[1] << 4 | buf[2] >> 2);
            }
            if buf[3] != 0x80 {
                target.push((buf[2] << 6) | buf[3]);
                self.next = 0
            } else {
                self.next = 0xF0
            }
        }

        Ok(())
    }

    fn fail(&mut self, err: DecodeError) -> Result<(), DecodeError> {
        self.target = Err(err);
        Err(err)
    }
}

//--- Default

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the value of a character of the standard alphabet.
fn decode_char(ch: char) -> Option<u8> {
    let val = match ch {
        'A'..='Z' => u32::from(ch) - u32::from('A'),
        'a'..='z' => u32::from(ch) - u32::from('a') + 26,
        '0'..='9' => u32::from(ch) - u32::from('0') + 52,
        '+' => 62,
        '/' => 63,
        _ => return None,
    };
    // All values are below 64.
    Some(val as u8)
}

//============ Error Types ===================================================

//------------ DecodeError ---------------------------------------------------

/// An error happened while decoding a base 16 or base 64 encoded string.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DecodeError {
    /// A character was pushed that isn’t allowed in the encoding.
    IllegalChar(char),

    /// There was trailing data after a padding sequence.
    TrailingInput,

    /// The input ended with an incomplete sequence.
    ShortInput,
}

//--- Display and Error

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DecodeError::TrailingInput => f.write_str("trailing input"),
            DecodeError::IllegalChar(ch) => {
                write!(f, "illegal character '{}'", ch)
            }
            DecodeError::ShortInput => f.write_str("incomplete input"),
        }
    }
}

impl std::error::Error for DecodeError {}

//============ Constants =====================================================

const STANDARD_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const URL_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// The padding character
const PAD: char = '=';

//============ Test ==========================================================
