//! Error types for field arithmetic and Reed-Solomon coding

use thiserror::Error;

/// Errors that can occur while building a field or codec, or while coding
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RsError {
    /// Field parameters do not describe GF(2^8) generated by a primitive element
    #[error(
        "Invalid field parameters (prime={prime}, power={power}, primitive={primitive:#04x}, poly1={poly1:#05x}): {reason}"
    )]
    InvalidFieldParameters {
        prime: u32,
        power: u32,
        primitive: u8,
        poly1: u16,
        reason: String,
    },

    /// Inverse, logarithm, division or 0^0 on the zero element
    #[error("Division by zero in Galois field")]
    DivisionByZero,

    /// Parity length outside 1..=254
    #[error("Invalid parity length {0}: must be between 1 and 254")]
    InvalidParityLength(usize),

    /// Erasure index out of range, duplicated, or too many erasures
    #[error("Invalid erasure positions: {0}")]
    InvalidErasurePositions(String),

    /// More errors and erasures than the parity can correct
    #[error("Uncorrectable codeword: {0}")]
    Uncorrectable(String),

    /// Message empty or too long to fit a codeword with the parity attached
    #[error("Invalid message length {len}: must be non-empty and fit 255 bytes with {ecc_len} parity bytes")]
    InvalidMessageLength { len: usize, ecc_len: usize },

    /// Codeword not longer than the parity or longer than 255 bytes
    #[error("Invalid codeword length {len}: must exceed {ecc_len} parity bytes and be at most 255")]
    InvalidCodewordLength { len: usize, ecc_len: usize },

    /// Block length cannot hold a message byte plus parity
    #[error("Invalid block length {block_len}: must exceed {ecc_len} parity bytes and be at most 255")]
    InvalidBlockLength { block_len: usize, ecc_len: usize },

    /// A block of a multi-block buffer failed to decode
    #[error("Block {block} failed to decode: {source}")]
    BlockDecode {
        block: usize,
        #[source]
        source: Box<RsError>,
    },

    /// Dedicated worker pool could not be created
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(String),
}

/// Type alias for Result with RsError
pub type Result<T> = std::result::Result<T, RsError>;
