//! Configuration for fields, codecs and block coding

use crate::error::{Result, RsError};
use crate::galois::{gf256, GaloisField, DEFAULT_POLY1, DEFAULT_PRIMITIVE};
use std::sync::Arc;

/// Parameters of the GF(2^8) instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldConfig {
    /// Primitive element used to generate the field
    pub primitive: u8,
    /// Reducing polynomial, with or without the x⁸ term
    pub poly1: u16,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            primitive: DEFAULT_PRIMITIVE,
            poly1: 0x100 | DEFAULT_POLY1,
        }
    }
}

impl FieldConfig {
    pub fn new(primitive: u8, poly1: u16) -> Self {
        Self { primitive, poly1 }
    }

    /// Build the field, sharing the global instance for the default parameters
    pub fn build(&self) -> Result<Arc<GaloisField>> {
        if self.primitive == DEFAULT_PRIMITIVE
            && (self.poly1 & 0xFF) == DEFAULT_POLY1
            && self.poly1 <= 0x1FF
        {
            return Ok(gf256());
        }
        GaloisField::new(2, 8, self.primitive, self.poly1).map(Arc::new)
    }
}

/// Configuration for a Reed-Solomon codec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    pub field: FieldConfig,
    /// Number of parity bytes per codeword
    pub ecc_len: usize,
    /// Parity after the message (true) or before it (false)
    pub systematic: bool,
}

impl CodecConfig {
    pub fn new(ecc_len: usize) -> Self {
        Self {
            field: FieldConfig::default(),
            ecc_len,
            systematic: true,
        }
    }

    /// Derive the parity length from a codeword length and a message length
    pub fn from_lengths(block_len: usize, message_len: usize) -> Result<Self> {
        if block_len > 255 || message_len == 0 || message_len >= block_len {
            return Err(RsError::InvalidBlockLength {
                block_len,
                ecc_len: block_len.saturating_sub(message_len),
            });
        }
        Ok(Self::new(block_len - message_len))
    }

    pub fn with_field(mut self, field: FieldConfig) -> Self {
        self.field = field;
        self
    }

    pub fn with_systematic(mut self, systematic: bool) -> Self {
        self.systematic = systematic;
        self
    }

    /// Largest message that fits one codeword
    pub fn max_message_len(&self) -> usize {
        255usize.saturating_sub(self.ecc_len)
    }
}

/// Configuration for splitting long buffers into codeword blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockConfig {
    /// Codeword length of every block but the last
    pub block_len: usize,
    /// Whether to code blocks in parallel (false = single-threaded)
    pub parallel: bool,
    /// Number of worker threads (0 = rayon's global pool)
    pub threads: usize,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            block_len: 255,
            parallel: true,
            threads: 0,
        }
    }
}

impl BlockConfig {
    pub fn new(block_len: usize, parallel: bool, threads: usize) -> Self {
        Self {
            block_len,
            parallel,
            threads,
        }
    }

    /// Get effective thread count (auto-detect if 0)
    pub fn effective_threads(&self) -> usize {
        match (self.parallel, self.threads) {
            (false, _) => 1, // Sequential mode always uses single thread
            (true, 0) => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            (true, n) => n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lengths() {
        let config = CodecConfig::from_lengths(255, 223).unwrap();
        assert_eq!(config.ecc_len, 32);
        assert_eq!(config.max_message_len(), 223);
        assert!(config.systematic);

        assert!(CodecConfig::from_lengths(10, 10).is_err());
        assert!(CodecConfig::from_lengths(256, 200).is_err());
        assert!(CodecConfig::from_lengths(10, 0).is_err());
    }

    #[test]
    fn test_default_field_is_shared() {
        let a = FieldConfig::default().build().unwrap();
        let b = FieldConfig::new(2, 0x1D).build().unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        let aes = FieldConfig::new(3, 0x11B).build().unwrap();
        assert_eq!(aes.poly1(), 0x1B);
    }

    #[test]
    fn test_effective_threads() {
        assert_eq!(BlockConfig::new(255, false, 8).effective_threads(), 1);
        assert_eq!(BlockConfig::new(255, true, 3).effective_threads(), 3);
        assert!(BlockConfig::default().effective_threads() >= 1);
    }
}
