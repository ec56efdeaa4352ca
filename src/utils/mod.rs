//! Various utility modules.

pub mod base16;
pub mod base64;

pub(crate) mod config;
