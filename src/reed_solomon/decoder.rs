//! Errata decoding: locator search, Chien search and Forney correction
//!
//! Positions are expressed as powers: the byte at index `p` of an `n`-byte
//! codeword is the coefficient of `x^(n-1-p)`, and its locator is `α^(n-1-p)`.

use crate::error::{Result, RsError};
use crate::galois::GaloisField;
use crate::poly::poly_trim;
use log::trace;
use smallvec::SmallVec;

/// Correction found by the decoder: (codeword index, error value)
pub type Corrections = SmallVec<[(usize, u8); 32]>;

/// Errata locator `Λ(x)` and the register length the search settled on
struct Locator {
    poly: Vec<u8>,
    len: usize,
}

/// Berlekamp-Massey seeded with the erasure locator
///
/// The erasure locator `Γ(x) = ∏(1 + X_j x)` is known up front, so the
/// register starts at `Γ` with length `e` and only the syndromes
/// `S_e .. S_{2t-1}` drive the search for unknown error positions.
fn errata_locator(gf: &GaloisField, synds: &[u8], erasure_powers: &[usize]) -> Result<Locator> {
    let erasures = erasure_powers.len();

    let mut gamma = vec![1u8];
    for &power in erasure_powers {
        gamma = gf.poly_mul(&gamma, &[gf.exp(power as u32), 1]);
    }

    let mut lambda = gamma.clone();
    let mut prev = gamma;
    let mut len = erasures;

    for r in erasures..synds.len() {
        // discrepancy: Σ Λ_j S_{r-j}, Λ_j is the coefficient of x^j
        let delta = lambda
            .iter()
            .rev()
            .take(len + 1)
            .enumerate()
            .fold(0u8, |d, (j, &c)| d ^ gf.mul(c, synds[r - j]));

        if delta == 0 {
            prev.push(0);
        } else if 2 * len <= r + erasures {
            let mut shifted = prev.clone();
            shifted.push(0);
            let next = gf.poly_add(&lambda, &gf.poly_scale(&shifted, delta));

            prev = gf.poly_scale(&lambda, gf.inv(delta)?);
            len = r + 1 + erasures - len;
            lambda = next;
        } else {
            prev.push(0);
            lambda = gf.poly_add(&lambda, &gf.poly_scale(&prev, delta));
        }
    }

    Ok(Locator {
        poly: poly_trim(&lambda).to_vec(),
        len,
    })
}

/// Locate and size every error and erasure of an `n`-byte codeword
///
/// `synds[i]` is the codeword evaluated at `α^i`; `erasures` are codeword
/// indices; `chien_points[j]` is `α^-j`. Nothing is modified: the caller
/// applies the returned corrections and re-checks the syndromes.
pub fn find_errata(
    gf: &GaloisField,
    synds: &[u8],
    erasures: &[usize],
    n: usize,
    chien_points: &[u8],
) -> Result<Corrections> {
    let ecc_len = synds.len();
    let erasure_powers: SmallVec<[usize; 32]> = erasures.iter().map(|&p| n - 1 - p).collect();

    let locator = errata_locator(gf, synds, &erasure_powers)?;
    let degree = locator.poly.len() - 1;
    trace!(
        "Errata locator {:02x?} (degree {}, register length {})",
        locator.poly,
        degree,
        locator.len
    );

    if degree != locator.len {
        return Err(RsError::Uncorrectable(format!(
            "locator degree {} does not match register length {}",
            degree, locator.len
        )));
    }
    if 2 * locator.len > ecc_len + erasures.len() {
        return Err(RsError::Uncorrectable(format!(
            "{} errors and {} erasures exceed {} parity bytes",
            locator.len - erasures.len(),
            erasures.len(),
            ecc_len
        )));
    }

    // Chien search: Λ(α^-j) == 0 marks power j
    let evals = gf.poly_eval8(&locator.poly, &chien_points[..n]);
    let roots: SmallVec<[usize; 32]> = evals
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v == 0)
        .map(|(power, _)| power)
        .collect();

    if roots.len() != degree {
        return Err(RsError::Uncorrectable(format!(
            "found {} locator roots inside the codeword, expected {}",
            roots.len(),
            degree
        )));
    }

    // Forney: Y = X · Ω(X⁻¹) / Λ'(X⁻¹) with Ω = S·Λ mod x^2t
    let synd_poly: SmallVec<[u8; 64]> = synds.iter().rev().copied().collect();
    let omega = gf.poly_mod_x_n(&gf.poly_mul(&synd_poly, &locator.poly), ecc_len);
    let deriv = gf.poly_deriv(&locator.poly);

    let mut corrections = Corrections::new();
    for power in roots {
        let x = gf.exp(power as u32);
        let x_inv = chien_points[power];

        let numerator = gf.poly_eval(&omega, x_inv);
        let denominator = gf.poly_eval(&deriv, x_inv);
        if denominator == 0 {
            return Err(RsError::Uncorrectable(format!(
                "repeated locator root at position {}",
                n - 1 - power
            )));
        }

        let magnitude = gf.mul(x, gf.div(numerator, denominator)?);
        corrections.push((n - 1 - power, magnitude));
    }

    trace!("Errata corrections {:02x?}", corrections);
    Ok(corrections)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chien_points(gf: &GaloisField) -> Vec<u8> {
        (0..255u32).map(|j| gf.exp(255 - j)).collect()
    }

    #[test]
    fn test_locator_of_erasures_only() {
        let gf = GaloisField::default();
        let synds = [0u8; 6];
        let locator = errata_locator(&gf, &synds, &[3, 7]).unwrap();

        // Γ(x) = (1 + α³x)(1 + α⁷x)
        let expected = gf.poly_mul(&[gf.exp(3), 1], &[gf.exp(7), 1]);
        assert_eq!(locator.poly, expected);
        assert_eq!(locator.len, 2);
    }

    #[test]
    fn test_single_error_located() {
        let gf = GaloisField::default();
        let n = 12;
        let ecc_len = 4;

        // Error value 0x5A at index 2, i.e. power n-1-2 = 9: S_i = 0x5A · α^(9i)
        let synds: Vec<u8> = (0..ecc_len as u32)
            .map(|i| gf.mul(0x5A, gf.exp(9 * i)))
            .collect();

        let corrections = find_errata(&gf, &synds, &[], n, &chien_points(&gf)).unwrap();
        assert_eq!(corrections.as_slice(), &[(2, 0x5A)]);
    }

    #[test]
    fn test_too_many_errata_rejected() {
        let gf = GaloisField::default();
        let erasures = [0, 1, 2, 3, 4];
        let result = find_errata(&gf, &[1, 2, 3, 4], &erasures, 12, &chien_points(&gf));
        assert!(matches!(result, Err(RsError::Uncorrectable(_))));
    }
}
