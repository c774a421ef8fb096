//! This crate implements encoding and decoding functionality for a binary convolutional code.
//! The encoder expands each input bit into a group of parity bits by feeding a fixed-length
//! shift register into a set of modulo-2 adders described by generator polynomials. The decoder
//! recovers the maximum-likelihood input sequence from a possibly corrupted parity sequence with
//! the Viterbi algorithm, using hard-decision Hamming-distance metrics throughout.

#![warn(
    clippy::complexity,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_allocation,
    unused_import_braces,
    unused_qualifications
)]

use thiserror::Error;

mod codec;
pub mod sim;
pub mod utils;

pub use codec::ViterbiCodec;

/// Custom error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid input error
    #[error("{0}")]
    InvalidInput(String),
    /// File read/write error
    #[error("{0}")]
    FileReadWriteError(#[from] std::io::Error),
    /// Serde read/write error
    #[error("{0}")]
    SerdeReadWriteError(#[from] serde_json::Error),
    /// Unknown error
    #[error("Unknown error")]
    Unknown,
}

/// Enumeration of binary symbol values
#[derive(Clone, Eq, PartialEq, Debug, Copy)]
pub enum Bit {
    /// Binary symbol `0`
    Zero = 0,
    /// Binary symbol `1`
    One = 1,
}
