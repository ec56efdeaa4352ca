//! Text encodings for buffer content.

use crate::utils::{base16, base64};
use crate::utils::base64::DecodeError;
use core::fmt;

//------------ Encoding ------------------------------------------------------

/// A scheme for representing binary data as text.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Encoding {
    /// Lower-case hex digits.
    ///
    /// When decoding, an optional `0x` prefix is discarded and an uneven
    /// number of digits is treated as if it had a leading `0`.
    Base16,

    /// The *base64* variant of [RFC 4648] with padding.
    ///
    /// [RFC 4648]: https://tools.ietf.org/html/rfc4648
    Base64,

    /// The URL-safe *base64url* variant of [RFC 4648] without padding.
    ///
    /// [RFC 4648]: https://tools.ietf.org/html/rfc4648
    Base64Url,
}

impl Encoding {
    /// Encodes `data` into a string.
    pub fn encode(self, data: &[u8]) -> String {
        match self {
            Encoding::Base16 => base16::encode_string(data),
            Encoding::Base64 => base64::encode_string(data),
            Encoding::Base64Url => base64::encode_string_url(data),
        }
    }

    /// Decodes a string into the data it represents.
    ///
    /// Both Base 64 variants accept either alphabet with or without
    /// padding.
    pub fn decode(self, encoded: &str) -> Result<Vec<u8>, DecodeError> {
        match self {
            Encoding::Base16 => base16::decode_lenient(encoded),
            Encoding::Base64 | Encoding::Base64Url => {
                base64::decode_lenient(encoded)
            }
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            Encoding::Base16 => "base16",
            Encoding::Base64 => "base64",
            Encoding::Base64Url => "base64url",
        })
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trip() {
        let data = b"\x00charcoal\xff\xfe";
        let schemes =
            [Encoding::Base16, Encoding::Base64, Encoding::Base64Url];
        for scheme in schemes {
            let encoded = scheme.encode(data);
            assert_eq!(scheme.decode(&encoded).unwrap(), data, "{scheme}");
        }
    }

    #[test]
    fn base16_prefix_and_odd_length() {
        assert_eq!(Encoding::Base16.encode(b"\xa1\xb2"), "a1b2");
        assert_eq!(Encoding::Base16.decode("0xa1b2").unwrap(), b"\xa1\xb2");
        assert_eq!(Encoding::Base16.decode("fff").unwrap(), b"\x0f\xff");
        assert!(Encoding::Base16.decode("xyz").is_err());
    }

    #[test]
    fn base64_url() {
        assert_eq!(Encoding::Base64.encode(b"\xfb\xff"), "+/8=");
        assert_eq!(Encoding::Base64Url.encode(b"\xfb\xff"), "-_8");
        assert_eq!(Encoding::Base64.decode("-_8").unwrap(), b"\xfb\xff");
        assert_eq!(Encoding::Base64Url.decode("+/8=").unwrap(), b"\xfb\xff");
    }
}
