//! Systematic Reed-Solomon codec over GF(2^8)
//!
//! A codec with `ecc_len` parity bytes uses the generator polynomial
//!
//! ```text
//! g(x) = (x - α^0)(x - α^1) ... (x - α^(ecc_len-1))
//! ```
//!
//! and corrects any mix of `t` errors and `e` erasures with
//! `2t + e <= ecc_len`. Codewords hold at most 255 bytes.
//!
//! ## Layout
//!
//! With `systematic = true` (the default) a codeword is `message ‖ parity`;
//! with `systematic = false` it is `parity ‖ message`. Either way the message
//! bytes are stored unchanged. Internally every codeword is handled in the
//! `message ‖ parity` order, which is the codeword polynomial with its
//! highest-degree coefficient first.

use super::decoder::find_errata;
use crate::config::CodecConfig;
use crate::error::{Result, RsError};
use crate::galois::{gf256, GaloisField, LIMIT};
use crate::poly::pack_points;
use log::debug;
use smallvec::SmallVec;
use std::sync::Arc;

/// Longest codeword: one byte per nonzero field element
pub const MAX_CODEWORD_LEN: usize = LIMIT;

/// Syndromes of a codeword, `S_i` = codeword evaluated at `α^i`
pub type Syndromes = SmallVec<[u8; 64]>;

/// Reed-Solomon encoder/decoder with a fixed parity length
#[derive(Debug, Clone)]
pub struct ReedSolomon {
    gf: Arc<GaloisField>,
    ecc_len: usize,
    systematic: bool,
    /// Monic, highest-degree coefficient first, `ecc_len + 1` coefficients
    generator: Vec<u8>,
    generator_roots: Vec<u8>,
    /// Generator roots packed eight per word for wide evaluation
    packed_roots: Vec<u64>,
    /// `α^-j` for every power `j` a codeword position can have
    chien_points: Vec<u8>,
}

impl ReedSolomon {
    /// Create a codec over `gf` with `ecc_len` parity bytes
    pub fn new(gf: Arc<GaloisField>, ecc_len: usize, systematic: bool) -> Result<Self> {
        if ecc_len == 0 || ecc_len >= LIMIT {
            return Err(RsError::InvalidParityLength(ecc_len));
        }

        let generator_roots: Vec<u8> = (0..ecc_len as u32).map(|i| gf.exp(i)).collect();
        let generator = generator_roots
            .iter()
            .fold(vec![1u8], |g, &root| gf.poly_mul(&g, &[1, gf.sub(0, root)]));
        let packed_roots = pack_points(&generator_roots);
        let chien_points = (0..LIMIT as u32).map(|j| gf.exp(LIMIT as u32 - j)).collect();

        debug!(
            "Reed-Solomon codec: ecc_len={}, systematic={}, generator={:02x?}",
            ecc_len, systematic, generator
        );

        Ok(Self {
            gf,
            ecc_len,
            systematic,
            generator,
            generator_roots,
            packed_roots,
            chien_points,
        })
    }

    /// Systematic codec over the shared default field
    pub fn with_ecc_len(ecc_len: usize) -> Result<Self> {
        Self::new(gf256(), ecc_len, true)
    }

    pub fn from_config(config: &CodecConfig) -> Result<Self> {
        Self::new(config.field.build()?, config.ecc_len, config.systematic)
    }

    pub fn field(&self) -> &Arc<GaloisField> {
        &self.gf
    }

    pub fn ecc_len(&self) -> usize {
        self.ecc_len
    }

    pub fn is_systematic(&self) -> bool {
        self.systematic
    }

    pub fn generator(&self) -> &[u8] {
        &self.generator
    }

    pub fn generator_roots(&self) -> &[u8] {
        &self.generator_roots
    }

    /// Largest message that fits one codeword
    pub fn max_message_len(&self) -> usize {
        MAX_CODEWORD_LEN - self.ecc_len
    }

    /// Encode `message` into a new codeword of `len + ecc_len` bytes
    pub fn encode(&self, message: &[u8]) -> Result<Vec<u8>> {
        let mut codeword = vec![0u8; message.len() + self.ecc_len];
        self.encode_to_slice(message, &mut codeword)?;
        Ok(codeword)
    }

    /// Encode `message` into `codeword`, which must be exactly `len + ecc_len` bytes
    pub fn encode_to_slice(&self, message: &[u8], codeword: &mut [u8]) -> Result<()> {
        if message.is_empty() || message.len() > self.max_message_len() {
            return Err(RsError::InvalidMessageLength {
                len: message.len(),
                ecc_len: self.ecc_len,
            });
        }
        if codeword.len() != message.len() + self.ecc_len {
            return Err(RsError::InvalidCodewordLength {
                len: codeword.len(),
                ecc_len: self.ecc_len,
            });
        }

        let (msg_out, parity_out) = if self.systematic {
            codeword.split_at_mut(message.len())
        } else {
            let (parity, msg) = codeword.split_at_mut(self.ecc_len);
            (msg, parity)
        };

        msg_out.copy_from_slice(message);
        // message · x^ecc_len mod g(x)
        self.gf
            .poly_mod_shifted_into(message, &self.generator[1..], parity_out);
        Ok(())
    }

    /// Syndromes of a codeword in this codec's layout
    pub fn syndromes(&self, codeword: &[u8]) -> Result<Syndromes> {
        self.check_codeword_len(codeword.len())?;
        let (high, low) = self.split_canonical(codeword);
        Ok(self.syndromes_split(high, low))
    }

    /// True if the codeword is divisible by the generator polynomial
    pub fn is_valid(&self, codeword: &[u8]) -> Result<bool> {
        Ok(self.syndromes(codeword)?.iter().all(|&s| s == 0))
    }

    /// Message part of a codeword in this codec's layout
    pub fn message<'a>(&self, codeword: &'a [u8]) -> &'a [u8] {
        if self.systematic {
            &codeword[..codeword.len().saturating_sub(self.ecc_len)]
        } else {
            &codeword[self.ecc_len.min(codeword.len())..]
        }
    }

    /// Decode a codeword and return the corrected message
    ///
    /// `erasures` lists codeword indices known to be corrupt. The input is not
    /// modified.
    pub fn decode(&self, codeword: &[u8], erasures: &[usize]) -> Result<Vec<u8>> {
        let mut corrected = codeword.to_vec();
        self.decode_in_place(&mut corrected, erasures)?;
        Ok(self.message(&corrected).to_vec())
    }

    /// Correct a codeword in place and return the number of bytes changed
    ///
    /// The buffer is only written when decoding succeeds.
    pub fn decode_in_place(&self, codeword: &mut [u8], erasures: &[usize]) -> Result<usize> {
        let n = codeword.len();
        self.check_codeword_len(n)?;
        let erasures = self.canonical_erasures(n, erasures)?;

        let mut canonical: SmallVec<[u8; MAX_CODEWORD_LEN]> = SmallVec::with_capacity(n);
        let (high, low) = self.split_canonical(codeword);
        canonical.extend_from_slice(high);
        canonical.extend_from_slice(low);

        let synds = self.syndromes_split(&canonical, &[]);
        if erasures.is_empty() && synds.iter().all(|&s| s == 0) {
            return Ok(0);
        }

        let corrections = find_errata(&self.gf, &synds, &erasures, n, &self.chien_points)?;
        for &(pos, magnitude) in &corrections {
            canonical[pos] = self.gf.add(canonical[pos], magnitude);
        }

        if self.syndromes_split(&canonical, &[]).iter().any(|&s| s != 0) {
            return Err(RsError::Uncorrectable(
                "syndromes nonzero after correction".to_string(),
            ));
        }

        let k = n - self.ecc_len;
        if self.systematic {
            codeword.copy_from_slice(&canonical);
        } else {
            codeword[..self.ecc_len].copy_from_slice(&canonical[k..]);
            codeword[self.ecc_len..].copy_from_slice(&canonical[..k]);
        }

        let changed = corrections.iter().filter(|&&(_, m)| m != 0).count();
        debug!(
            "Corrected {} bytes ({} erasures declared) in {}-byte codeword",
            changed,
            erasures.len(),
            n
        );
        Ok(changed)
    }

    fn check_codeword_len(&self, len: usize) -> Result<()> {
        if len <= self.ecc_len || len > MAX_CODEWORD_LEN {
            return Err(RsError::InvalidCodewordLength {
                len,
                ecc_len: self.ecc_len,
            });
        }
        Ok(())
    }

    /// Split a codeword into its `message ‖ parity` halves, in that order
    fn split_canonical<'a>(&self, codeword: &'a [u8]) -> (&'a [u8], &'a [u8]) {
        if self.systematic {
            (codeword, &[])
        } else {
            let (parity, message) = codeword.split_at(self.ecc_len);
            (message, parity)
        }
    }

    /// Validate erasure indices and map them to `message ‖ parity` order
    fn canonical_erasures(&self, n: usize, erasures: &[usize]) -> Result<SmallVec<[usize; 32]>> {
        if erasures.len() > self.ecc_len {
            return Err(RsError::InvalidErasurePositions(format!(
                "{} erasures exceed {} parity bytes",
                erasures.len(),
                self.ecc_len
            )));
        }

        let mut seen = [false; MAX_CODEWORD_LEN];
        let k = n - self.ecc_len;
        erasures
            .iter()
            .map(|&pos| {
                if pos >= n {
                    return Err(RsError::InvalidErasurePositions(format!(
                        "position {} outside {}-byte codeword",
                        pos, n
                    )));
                }
                if std::mem::replace(&mut seen[pos], true) {
                    return Err(RsError::InvalidErasurePositions(format!(
                        "position {} listed twice",
                        pos
                    )));
                }

                Ok(match (self.systematic, pos < self.ecc_len) {
                    (true, _) => pos,
                    (false, true) => pos + k,
                    (false, false) => pos - self.ecc_len,
                })
            })
            .collect()
    }

    /// Evaluate `high ‖ low` at every generator root, eight roots per pass
    fn syndromes_split(&self, high: &[u8], low: &[u8]) -> Syndromes {
        let mut synds = Syndromes::with_capacity(self.ecc_len);
        for (w, &roots) in self.packed_roots.iter().enumerate() {
            let evals = self.gf.poly_eval_wide(high, roots, 0);
            let evals = self.gf.poly_eval_wide(low, roots, evals);

            let lanes = (self.ecc_len - 8 * w).min(8);
            synds.extend_from_slice(&evals.to_le_bytes()[..lanes]);
        }
        synds
    }
}
