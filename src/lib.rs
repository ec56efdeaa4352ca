//! Byte buffers and a tag-length-value wire codec.
//!
//! This crate provides the building blocks for exchanging structured
//! messages over byte streams without a schema compiler: owned byte
//! buffers with well-defined mutability, a cursor for consuming bytes
//! sequentially, and a compact, deterministic TLV envelope format.
//!
//! # Modules
//!
//! * [base] contains the byte buffer types – mutable, immutable, and fixed
//!   length – the [`ByteReader`][base::ByteReader] cursor, and the byte
//!   order helpers used for packing integers,
//! * [tlv] contains the envelope data model and the codec translating it
//!   to and from its wire format,
//! * [utils] contains the Base 16 and Base 64 text encodings, and
//! * [digest] provides hashing helpers producing buffers.
//!
//! # Reference of Feature Flags
//!
//! * `bytes`: Enables conversions between the buffer types and the types
//!   `Bytes` and `BytesMut` from the
//!   [bytes](https://github.com/tokio-rs/bytes) crate.
//! * `serde`: Enables serializing and deserializing buffers via
//!   [serde](https://serde.rs/). Mutable buffers are serialized as a
//!   snapshot of their content and flags.

#![allow(renamed_and_removed_lints)]
#![allow(clippy::unknown_clippy_lints)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod base;
pub mod digest;
pub mod tlv;
pub mod utils;
