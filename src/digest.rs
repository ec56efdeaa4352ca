//! Hashing of buffer content.
//!
//! The [`Digest`] type wraps a byte sequence and computes message digests,
//! HMACs, and PBKDF2 derived keys over it using [ring].
//!
//! Each operation comes in two variants. The default one returns the
//! result as an [`ImmutableBuffer`] while the `_raw` variant returns a
//! plain vector. The `sha*` shortcuts return a fixed length buffer of the
//! right size.
//!
//! [ring]: https://docs.rs/ring/

use crate::base::fixed::{Bytes20, Bytes32, Bytes64, FixedBuffer};
use crate::base::immutable::ImmutableBuffer;
use core::fmt;
use core::num::NonZeroU32;
use ring::{digest, hmac, pbkdf2};

//------------ DigestAlg -----------------------------------------------------

/// A hash algorithm.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DigestAlg {
    /// SHA-1.
    ///
    /// Only use this for interoperating with legacy systems.
    Sha1,

    /// SHA-256.
    Sha256,

    /// SHA-384.
    Sha384,

    /// SHA-512.
    Sha512,
}

impl DigestAlg {
    /// Returns the length of the algorithm’s output in bytes.
    pub fn output_len(self) -> usize {
        self.digest_algorithm().output_len()
    }

    fn digest_algorithm(self) -> &'static digest::Algorithm {
        match self {
            DigestAlg::Sha1 => &digest::SHA1_FOR_LEGACY_USE_ONLY,
            DigestAlg::Sha256 => &digest::SHA256,
            DigestAlg::Sha384 => &digest::SHA384,
            DigestAlg::Sha512 => &digest::SHA512,
        }
    }

    fn hmac_algorithm(self) -> hmac::Algorithm {
        match self {
            DigestAlg::Sha1 => hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY,
            DigestAlg::Sha256 => hmac::HMAC_SHA256,
            DigestAlg::Sha384 => hmac::HMAC_SHA384,
            DigestAlg::Sha512 => hmac::HMAC_SHA512,
        }
    }

    fn pbkdf2_algorithm(self) -> pbkdf2::Algorithm {
        match self {
            DigestAlg::Sha1 => pbkdf2::PBKDF2_HMAC_SHA1,
            DigestAlg::Sha256 => pbkdf2::PBKDF2_HMAC_SHA256,
            DigestAlg::Sha384 => pbkdf2::PBKDF2_HMAC_SHA384,
            DigestAlg::Sha512 => pbkdf2::PBKDF2_HMAC_SHA512,
        }
    }
}

impl fmt::Display for DigestAlg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            DigestAlg::Sha1 => "SHA-1",
            DigestAlg::Sha256 => "SHA-256",
            DigestAlg::Sha384 => "SHA-384",
            DigestAlg::Sha512 => "SHA-512",
        })
    }
}

//------------ Digest --------------------------------------------------------

/// Hashing operations over a byte sequence.
#[derive(Clone, Copy, Debug)]
pub struct Digest<'a> {
    data: &'a [u8],
}

impl<'a> Digest<'a> {
    /// Creates a new value hashing the given data.
    pub fn new(data: &'a [u8]) -> Self {
        Digest { data }
    }

    /// Hashes the data `iterations` times.
    ///
    /// Each round hashes the output of the previous one. If `len` is
    /// given, the result is truncated to at most that many bytes.
    pub fn hash(
        &self,
        alg: DigestAlg,
        iterations: u32,
        len: Option<usize>,
    ) -> Result<ImmutableBuffer, DigestError> {
        self.hash_raw(alg, iterations, len).map(Into::into)
    }

    /// Hashes the data `iterations` times returning the raw bytes.
    pub fn hash_raw(
        &self,
        alg: DigestAlg,
        iterations: u32,
        len: Option<usize>,
    ) -> Result<Vec<u8>, DigestError> {
        let iterations =
            NonZeroU32::new(iterations).ok_or(DigestError::ZeroIterations)?;
        let alg = alg.digest_algorithm();
        let mut res = digest::digest(alg, self.data);
        for _ in 1..iterations.get() {
            res = digest::digest(alg, res.as_ref());
        }
        let mut res = res.as_ref().to_vec();
        if let Some(len) = len {
            res.truncate(len);
        }
        Ok(res)
    }

    /// Returns the HMAC of the data using `key`.
    pub fn hmac(&self, alg: DigestAlg, key: &[u8]) -> ImmutableBuffer {
        self.hmac_raw(alg, key).into()
    }

    /// Returns the HMAC of the data using `key` as raw bytes.
    pub fn hmac_raw(&self, alg: DigestAlg, key: &[u8]) -> Vec<u8> {
        let key = hmac::Key::new(alg.hmac_algorithm(), key);
        hmac::sign(&key, self.data).as_ref().to_vec()
    }

    /// Derives a key from the data via PBKDF2.
    ///
    /// The data is used as the secret. If `len` is `None`, the derived key
    /// has the output length of the algorithm.
    pub fn pbkdf2(
        &self,
        alg: DigestAlg,
        salt: &[u8],
        iterations: u32,
        len: Option<usize>,
    ) -> Result<ImmutableBuffer, DigestError> {
        self.pbkdf2_raw(alg, salt, iterations, len).map(Into::into)
    }

    /// Derives a key from the data via PBKDF2 returning the raw bytes.
    pub fn pbkdf2_raw(
        &self,
        alg: DigestAlg,
        salt: &[u8],
        iterations: u32,
        len: Option<usize>,
    ) -> Result<Vec<u8>, DigestError> {
        let iterations =
            NonZeroU32::new(iterations).ok_or(DigestError::ZeroIterations)?;
        let mut res = vec![0u8; len.unwrap_or_else(|| alg.output_len())];
        if res.is_empty() {
            return Err(DigestError::ZeroLength);
        }
        pbkdf2::derive(
            alg.pbkdf2_algorithm(),
            iterations,
            salt,
            self.data,
            &mut res,
        );
        Ok(res)
    }

    /// Returns the SHA-1 digest of the data.
    pub fn sha1(&self) -> Bytes20 {
        self.fixed(DigestAlg::Sha1)
    }

    /// Returns the SHA-256 digest of the data.
    pub fn sha256(&self) -> Bytes32 {
        self.fixed(DigestAlg::Sha256)
    }

    /// Returns the SHA-512 digest of the data.
    pub fn sha512(&self) -> Bytes64 {
        self.fixed(DigestAlg::Sha512)
    }

    fn fixed<const N: usize>(&self, alg: DigestAlg) -> FixedBuffer<N> {
        let res = digest::digest(alg.digest_algorithm(), self.data);
        let mut array = [0u8; N];
        // N always is the output length of alg.
        array.copy_from_slice(res.as_ref());
        FixedBuffer::from_array(array)
    }
}

//============ Error Types ===================================================

//------------ DigestError ---------------------------------------------------

/// The arguments to a digest operation were invalid.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DigestError {
    /// The number of iterations was zero.
    ZeroIterations,

    /// A derived key of zero length was requested.
    ZeroLength,
}

impl fmt::Display for DigestError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            DigestError::ZeroIterations => "iterations must be at least 1",
            DigestError::ZeroLength => "requested key length is zero",
        })
    }
}

impl std::error::Error for DigestError {}

//============ Testing =======================================================
