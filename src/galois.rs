//! Galois Field GF(2^8) arithmetic
//!
//! This module implements 8-bit Galois Field arithmetic with precomputed
//! logarithm and exponential tables. The default field uses the reducing
//! polynomial 0x11D (x⁸ + x⁴ + x³ + x² + 1) with primitive element 2, the
//! field used by most byte-oriented Reed-Solomon codes (QR codes, CDs, DVB).
//!
//! Two kinds of operations are provided:
//!
//! - scalar operations on single elements (`mul`, `div`, `inv`, ...), all
//!   table lookups;
//! - wide operations that treat a `u64` as eight packed field elements and
//!   operate lane-wise without tables (`mul_wide`, `poly_eval_wide`).
//!
//! Polynomial operations live in [`crate::poly`].

use crate::error::{Result, RsError};
use log::debug;
use std::sync::{Arc, OnceLock};

/// Number of elements in GF(2^8)
pub const FIELD_ELEMENTS: usize = 256;

/// Order of the multiplicative group (number of nonzero elements)
pub const LIMIT: usize = FIELD_ELEMENTS - 1;

/// Default primitive element
pub const DEFAULT_PRIMITIVE: u8 = 2;

/// Default reducing polynomial 0x11D with the x⁸ term masked off
pub const DEFAULT_POLY1: u16 = 0x1D;

const REP_0X01: u64 = repeat_byte(0x01);
const REP_0X7F: u64 = repeat_byte(0x7f);
const REP_0X80: u64 = repeat_byte(0x80);

/// Broadcast a byte into every lane of a 64-bit word
#[inline]
pub const fn repeat_byte(n: u8) -> u64 {
    u64::from_le_bytes([n; 8])
}

/// Precomputed tables and parameters for one instance of GF(2^8)
#[derive(Clone)]
pub struct GaloisField {
    primitive: u8,
    poly1: u8,
    poly_wide: u64,
    log_table: [u8; FIELD_ELEMENTS],
    exp_table: [u8; 2 * LIMIT], // 2x size to avoid modulo in calculations
}

impl GaloisField {
    /// Create a field for `GF(prime^power)` generated by `primitive` modulo `poly1`
    ///
    /// `poly1` may be given with or without the x⁸ term (0x11D and 0x1D are the
    /// same polynomial). Fails if the parameters do not describe GF(2^8), or if
    /// powers of `primitive` do not cycle through all 255 nonzero elements,
    /// which happens when `poly1` is reducible or `primitive` is not a generator.
    pub fn new(prime: u32, power: u32, primitive: u8, poly1: u16) -> Result<Self> {
        let invalid = |reason: &str| RsError::InvalidFieldParameters {
            prime,
            power,
            primitive,
            poly1,
            reason: reason.to_string(),
        };

        if prime != 2 || power != 8 {
            return Err(invalid("only GF(2^8) is supported"));
        }
        if poly1 > 0x1FF {
            return Err(invalid("polynomial degree exceeds 8"));
        }

        let poly1_low = (poly1 & 0xFF) as u8;
        let (log_table, exp_table) =
            build_tables(primitive, poly1_low).map_err(|reason| invalid(reason))?;

        debug!(
            "Built GF(2^8) tables: primitive={:#04x}, poly1={:#05x}",
            primitive,
            0x100 | poly1_low as u16
        );

        Ok(Self {
            primitive,
            poly1: poly1_low,
            poly_wide: repeat_byte(poly1_low),
            log_table,
            exp_table,
        })
    }

    /// Field characteristic, always 2
    pub fn prime(&self) -> u32 {
        2
    }

    /// Extension degree, always 8
    pub fn power(&self) -> u32 {
        8
    }

    /// Primitive element the tables were generated from
    pub fn primitive(&self) -> u8 {
        self.primitive
    }

    /// Reducing polynomial with the x⁸ term masked off
    pub fn poly1(&self) -> u8 {
        self.poly1
    }

    /// Number of field elements, always 256
    pub fn field_elements(&self) -> usize {
        FIELD_ELEMENTS
    }

    /// Add two elements in GF(2^8) - this is just XOR
    #[inline]
    pub fn add(&self, a: u8, b: u8) -> u8 {
        a ^ b
    }

    /// Subtract two elements in GF(2^8) - same as addition (XOR)
    #[inline]
    pub fn sub(&self, a: u8, b: u8) -> u8 {
        a ^ b
    }

    /// Multiply two elements in GF(2^8)
    #[inline]
    pub fn mul(&self, a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }

        let log_a = self.log_table[a as usize] as usize;
        let log_b = self.log_table[b as usize] as usize;
        self.exp_table[log_a + log_b]
    }

    /// Divide two elements in GF(2^8)
    #[inline]
    pub fn div(&self, a: u8, b: u8) -> Result<u8> {
        if b == 0 {
            return Err(RsError::DivisionByZero);
        }
        if a == 0 {
            return Ok(0);
        }

        let log_a = self.log_table[a as usize] as usize;
        let log_b = self.log_table[b as usize] as usize;
        Ok(self.exp_table[log_a + LIMIT - log_b])
    }

    /// Get the multiplicative inverse of an element
    #[inline]
    pub fn inv(&self, a: u8) -> Result<u8> {
        if a == 0 {
            return Err(RsError::DivisionByZero);
        }

        Ok(self.exp_table[LIMIT - self.log_table[a as usize] as usize])
    }

    /// Discrete logarithm to the base of the primitive element
    #[inline]
    pub fn log(&self, a: u8) -> Result<u8> {
        if a == 0 {
            return Err(RsError::DivisionByZero);
        }

        Ok(self.log_table[a as usize])
    }

    /// Primitive element raised to `n` (taken modulo 255)
    #[inline]
    pub fn exp(&self, n: u32) -> u8 {
        self.exp_table[n as usize % LIMIT]
    }

    /// Raise an element to a power in GF(2^8)
    ///
    /// `0^n` is 0 for `n > 0`; `0^0` is undefined and reported as
    /// [`RsError::DivisionByZero`].
    #[inline]
    pub fn pow(&self, base: u8, exponent: u32) -> Result<u8> {
        if base == 0 {
            return if exponent == 0 {
                Err(RsError::DivisionByZero)
            } else {
                Ok(0)
            };
        }

        let log_base = self.log_table[base as usize] as u64;
        let log_result = (log_base * exponent as u64) % LIMIT as u64;
        Ok(self.exp_table[log_result as usize])
    }

    /// Multiply every byte of `buffer` by `scalar` in place
    pub fn mul8(&self, buffer: &mut [u8], scalar: u8) {
        if scalar == 0 {
            buffer.fill(0);
            return;
        }

        let log_s = self.log_table[scalar as usize] as usize;
        for b in buffer.iter_mut().filter(|b| **b != 0) {
            *b = self.exp_table[self.log_table[*b as usize] as usize + log_s];
        }
    }

    /// output = scalar * input, over the common length of both buffers
    pub fn mul8_into(&self, input: &[u8], output: &mut [u8], scalar: u8) {
        let min_len = input.len().min(output.len());
        output[..min_len].copy_from_slice(&input[..min_len]);
        self.mul8(&mut output[..min_len], scalar);
    }

    /// Lane-wise product of eight packed field elements
    ///
    /// Byte `i` of the result is `mul(a_i, b_i)`. Uses shift-and-reduce on all
    /// lanes at once instead of table lookups.
    #[inline]
    pub fn mul_wide(&self, a: u64, b: u64) -> u64 {
        let mut r = 0u64;
        for i in (0..8).rev() {
            // 0xFF in every lane whose high bit is about to be shifted out
            let carry = ((r & REP_0X80) >> 7) * 0xFF;
            r = ((r & REP_0X7F) << 1) ^ (self.poly_wide & carry);

            let select = ((a >> i) & REP_0X01) * 0xFF;
            r ^= b & select;
        }
        r
    }

    /// Evaluate `poly` at eight packed points at once, continuing from `seed`
    ///
    /// Horner's rule on every lane; a nonzero `seed` continues an evaluation
    /// whose higher-degree coefficients were consumed by a previous call.
    #[inline]
    pub fn poly_eval_wide(&self, poly: &[u8], xs: u64, seed: u64) -> u64 {
        poly.iter()
            .fold(seed, |r, &c| self.mul_wide(r, xs) ^ repeat_byte(c))
    }
}

impl Default for GaloisField {
    fn default() -> Self {
        let (log_table, exp_table) = match build_tables(DEFAULT_PRIMITIVE, DEFAULT_POLY1 as u8) {
            Ok(tables) => tables,
            Err(reason) => unreachable!("default GF(2^8) parameters rejected: {reason}"),
        };

        Self {
            primitive: DEFAULT_PRIMITIVE,
            poly1: DEFAULT_POLY1 as u8,
            poly_wide: repeat_byte(DEFAULT_POLY1 as u8),
            log_table,
            exp_table,
        }
    }
}

impl std::fmt::Debug for GaloisField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GaloisField")
            .field("primitive", &self.primitive)
            .field("poly1", &format_args!("{:#05x}", 0x100 | self.poly1 as u16))
            .finish()
    }
}

/// Shift-and-reduce multiplication, only used to generate the tables
fn mul_bitwise(a: u8, b: u8, poly1: u8) -> u8 {
    let mut r = 0u8;
    for i in (0..8).rev() {
        let carry = r & 0x80 != 0;
        r <<= 1;
        if carry {
            r ^= poly1;
        }
        if a & (1 << i) != 0 {
            r ^= b;
        }
    }
    r
}

type Tables = ([u8; FIELD_ELEMENTS], [u8; 2 * LIMIT]);

/// Build logarithm and exponential tables by walking the powers of `primitive`
fn build_tables(primitive: u8, poly1: u8) -> std::result::Result<Tables, &'static str> {
    let mut log_table = [0u8; FIELD_ELEMENTS];
    let mut exp_table = [0u8; 2 * LIMIT];
    let mut seen = [false; FIELD_ELEMENTS];

    let mut value = 1u8;
    for i in 0..LIMIT {
        if value == 0 {
            return Err("powers of the primitive element reach zero (reducible polynomial)");
        }
        if seen[value as usize] {
            return Err("multiplicative cycle shorter than 255 (element is not primitive)");
        }
        seen[value as usize] = true;

        exp_table[i] = value;
        log_table[value as usize] = i as u8;
        value = mul_bitwise(value, primitive, poly1);
    }

    if value != 1 {
        return Err("multiplicative cycle does not close after 255 steps");
    }

    // Duplicate the table for easier calculation
    for i in LIMIT..2 * LIMIT {
        exp_table[i] = exp_table[i - LIMIT];
    }

    Ok((log_table, exp_table))
}

/// Global default field instance (primitive 2, polynomial 0x11D)
static GF256: OnceLock<Arc<GaloisField>> = OnceLock::new();

/// Get the shared default GF(2^8) instance
pub fn gf256() -> Arc<GaloisField> {
    Arc::clone(GF256.get_or_init(|| Arc::new(GaloisField::default())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_explicit_parameters() {
        let explicit = GaloisField::new(2, 8, 2, 0x11D).unwrap();
        let default = GaloisField::default();

        assert_eq!(explicit.poly1(), 0x1D);
        assert_eq!(explicit.exp_table, default.exp_table);
        assert_eq!(explicit.log_table, default.log_table);
    }

    #[test]
    fn test_known_products() {
        let gf = GaloisField::default();

        assert_eq!(gf.mul(2, 2), 4);
        assert_eq!(gf.mul(0x80, 2), 0x1D);
        assert_eq!(gf.exp(8), 0x1D);
        assert_eq!(gf.exp(255), 1);
    }

    #[test]
    fn test_bitwise_agrees_with_tables() {
        let gf = GaloisField::default();
        for a in 0..=255u8 {
            for b in 0..=255u8 {
                assert_eq!(gf.mul(a, b), mul_bitwise(a, b, gf.poly1()), "a={a} b={b}");
            }
        }
    }

    #[test]
    fn test_exp_table_is_extended() {
        let gf = GaloisField::default();
        for i in 0..LIMIT {
            assert_eq!(gf.exp_table[i], gf.exp_table[i + LIMIT]);
        }
    }

    #[test]
    fn test_non_primitive_element_rejected() {
        // 2 has order 51 modulo the AES polynomial; 3 generates the field
        assert!(matches!(
            GaloisField::new(2, 8, 2, 0x11B),
            Err(RsError::InvalidFieldParameters { .. })
        ));
        assert!(GaloisField::new(2, 8, 3, 0x11B).is_ok());
    }

    #[test]
    fn test_repeat_byte() {
        assert_eq!(repeat_byte(0xAB), 0xABAB_ABAB_ABAB_ABAB);
        assert_eq!(repeat_byte(0), 0);
    }
}
