//! Polynomial arithmetic over GF(2^8)
//!
//! Polynomials are byte slices with the **highest-degree coefficient first**:
//! `[1, 0, 3]` is `x² + 3`. Every operation here, and the Reed-Solomon codec,
//! uses this order, so a codeword read left to right is the codeword polynomial.
//!
//! Results are returned as fresh vectors; inputs are never modified.

use crate::error::{Result, RsError};
use crate::galois::GaloisField;

/// Drop leading zero coefficients
///
/// The zero polynomial trims to an empty slice.
pub fn poly_trim(p: &[u8]) -> &[u8] {
    let start = p.iter().position(|&c| c != 0).unwrap_or(p.len());
    &p[start..]
}

impl GaloisField {
    /// Add polynomials
    ///
    /// Constant terms are aligned; the result has `max(len(p1), len(p2))`
    /// coefficients.
    pub fn poly_add(&self, p1: &[u8], p2: &[u8]) -> Vec<u8> {
        let len = p1.len().max(p2.len());
        let mut out = vec![0u8; len];

        out[len - p1.len()..].copy_from_slice(p1);
        for (o, &c) in out[len - p2.len()..].iter_mut().zip(p2) {
            *o = self.add(*o, c);
        }
        out
    }

    /// Subtract polynomials (identical to [`GaloisField::poly_add`] in GF(2^8))
    pub fn poly_sub(&self, p1: &[u8], p2: &[u8]) -> Vec<u8> {
        let len = p1.len().max(p2.len());
        let mut out = vec![0u8; len];

        out[len - p1.len()..].copy_from_slice(p1);
        for (o, &c) in out[len - p2.len()..].iter_mut().zip(p2) {
            *o = self.sub(*o, c);
        }
        out
    }

    /// Multiply polynomials
    ///
    /// The product has `len(p1) + len(p2) - 1` coefficients; it is empty when
    /// either operand is empty.
    pub fn poly_mul(&self, p1: &[u8], p2: &[u8]) -> Vec<u8> {
        if p1.is_empty() || p2.is_empty() {
            return Vec::new();
        }

        let mut out = vec![0u8; p1.len() + p2.len() - 1];
        for (i, &a) in p1.iter().enumerate() {
            if a == 0 {
                continue;
            }
            for (j, &b) in p2.iter().enumerate() {
                out[i + j] ^= self.mul(a, b);
            }
        }
        out
    }

    /// Multiply every coefficient by `a`
    pub fn poly_scale(&self, p: &[u8], a: u8) -> Vec<u8> {
        let mut out = p.to_vec();
        self.mul8(&mut out, a);
        out
    }

    /// Polynomial quotient and remainder
    ///
    /// Leading zero coefficients of `p2` are ignored. The remainder has one
    /// coefficient less than the trimmed divisor; if `p1` has lower degree than
    /// the divisor, the quotient is empty and the remainder is `p1` itself.
    pub fn poly_divmod(&self, p1: &[u8], p2: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
        let divisor = poly_trim(p2);
        if divisor.is_empty() {
            return Err(RsError::DivisionByZero);
        }

        if p1.len() < divisor.len() {
            return Ok((Vec::new(), p1.to_vec()));
        }

        // Synthetic division in place: quotient lands in the front of `out`,
        // remainder in the back.
        let mut out = p1.to_vec();
        let norm = self.inv(divisor[0])?;
        let sep = p1.len() - divisor.len() + 1;

        for i in 0..sep {
            let c = self.mul(out[i], norm);
            out[i] = c;
            if c == 0 {
                continue;
            }
            for (j, &d) in divisor.iter().enumerate().skip(1) {
                out[i + j] ^= self.mul(d, c);
            }
        }

        let remainder = out.split_off(sep);
        Ok((out, remainder))
    }

    /// Polynomial remainder
    pub fn poly_mod(&self, p1: &[u8], p2: &[u8]) -> Result<Vec<u8>> {
        self.poly_divmod(p1, p2).map(|(_, remainder)| remainder)
    }

    /// Reduce modulo `x^n`
    ///
    /// Keeps exactly the `n` lowest-degree coefficients, zero-padding on the
    /// high-degree side when `p` is shorter.
    pub fn poly_mod_x_n(&self, p: &[u8], n: usize) -> Vec<u8> {
        let mut out = vec![0u8; n];
        let keep = p.len().min(n);
        out[n - keep..].copy_from_slice(&p[p.len() - keep..]);
        out
    }

    /// Shifted polynomial remainder: `p · x^n mod (x^n + tail)`, `n = len(tail)`
    ///
    /// `tail` is a monic divisor without its leading 1. The shift is never
    /// materialised; coefficients of `p` are fed through a shift register.
    pub fn poly_mod_shifted(&self, p: &[u8], tail: &[u8]) -> Vec<u8> {
        let mut rem = vec![0u8; tail.len()];
        self.poly_mod_shifted_into(p, tail, &mut rem);
        rem
    }

    /// [`GaloisField::poly_mod_shifted`] writing into `rem` (`len(rem) == len(tail)`)
    pub fn poly_mod_shifted_into(&self, p: &[u8], tail: &[u8], rem: &mut [u8]) {
        debug_assert_eq!(rem.len(), tail.len());
        rem.fill(0);
        if rem.is_empty() {
            return;
        }

        let last = rem.len() - 1;
        for &c in p {
            let feedback = rem[0] ^ c;
            rem.rotate_left(1);
            rem[last] = 0;

            if feedback == 0 {
                continue;
            }
            for (r, &t) in rem.iter_mut().zip(tail) {
                *r ^= self.mul(t, feedback);
            }
        }
    }

    /// Evaluate polynomial at `x` (Horner's rule)
    #[inline]
    pub fn poly_eval(&self, p: &[u8], x: u8) -> u8 {
        p.iter().fold(0, |r, &c| self.mul(r, x) ^ c)
    }

    /// Evaluate polynomial at every point of `points`
    ///
    /// Points are evaluated eight at a time with
    /// [`GaloisField::poly_eval_wide`]; the result has one value per point.
    pub fn poly_eval8(&self, p: &[u8], points: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(points.len());
        for chunk in points.chunks(8) {
            let mut lanes = [0u8; 8];
            lanes[..chunk.len()].copy_from_slice(chunk);

            let evals = self.poly_eval_wide(p, u64::from_le_bytes(lanes), 0);
            out.extend_from_slice(&evals.to_le_bytes()[..chunk.len()]);
        }
        out
    }

    /// Formal derivative
    ///
    /// In characteristic 2 the even-degree terms vanish and the odd-degree
    /// terms keep their coefficient. The result has one coefficient less.
    pub fn poly_deriv(&self, p: &[u8]) -> Vec<u8> {
        let degree = p.len().saturating_sub(1);
        p.iter()
            .take(degree)
            .enumerate()
            .map(|(i, &c)| if (degree - i) % 2 == 1 { c } else { 0 })
            .collect()
    }
}

/// Packed evaluation points for [`GaloisField::poly_eval_wide`]
///
/// Lane `i` of word `w` holds `points[8 * w + i]`; unused lanes are zero.
pub fn pack_points(points: &[u8]) -> Vec<u64> {
    points
        .chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u64, |w, (i, &x)| w | ((x as u64) << (8 * i)))
        })
        .collect()
}
