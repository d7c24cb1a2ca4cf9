//! Reed-Solomon Error Correction Module
//!
//! This module provides a systematic Reed-Solomon codec over GF(2^8):
//! parity bytes are computed from a generator polynomial with consecutive
//! roots `α^0 .. α^(ecc_len-1)`, and decoding corrects unknown errors and
//! declared erasures with Berlekamp-Massey, Chien search and Forney's formula.

pub mod blocks;
pub mod codec;
pub mod decoder;

pub use blocks::*;
pub use codec::*;
