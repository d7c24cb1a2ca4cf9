//! Block coding for buffers longer than one codeword
//!
//! Data is cut into messages of `block_len - ecc_len` bytes and each message
//! is encoded into its own codeword; codewords are stored back to back. The
//! last block holds whatever is left and may be shorter.
//!
//! Blocks are independent, so they are coded in parallel with rayon unless
//! the configuration asks for single-threaded operation.

use super::codec::{ReedSolomon, MAX_CODEWORD_LEN};
use crate::config::BlockConfig;
use crate::error::{Result, RsError};
use log::debug;
use rayon::prelude::*;

/// A codec paired with a block layout
pub struct BlockCodec {
    codec: ReedSolomon,
    config: BlockConfig,
    pool: Option<rayon::ThreadPool>,
}

impl BlockCodec {
    pub fn new(codec: ReedSolomon, config: BlockConfig) -> Result<Self> {
        let ecc_len = codec.ecc_len();
        if config.block_len <= ecc_len || config.block_len > MAX_CODEWORD_LEN {
            return Err(RsError::InvalidBlockLength {
                block_len: config.block_len,
                ecc_len,
            });
        }

        // A dedicated pool only when a thread count was requested
        let pool = if config.parallel && config.threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.effective_threads())
                .build()
                .map_err(|e| RsError::ThreadPool(e.to_string()))?;
            Some(pool)
        } else {
            None
        };

        Ok(Self {
            codec,
            config,
            pool,
        })
    }

    pub fn codec(&self) -> &ReedSolomon {
        &self.codec
    }

    pub fn config(&self) -> &BlockConfig {
        &self.config
    }

    /// Message bytes carried by a full block
    pub fn message_len(&self) -> usize {
        self.config.block_len - self.codec.ecc_len()
    }

    /// Size of the encoded form of `data_len` bytes
    pub fn encoded_len(&self, data_len: usize) -> usize {
        data_len + data_len.div_ceil(self.message_len()) * self.codec.ecc_len()
    }

    /// Encode `data` block by block; empty input gives empty output
    pub fn encode_blocks(&self, data: &[u8]) -> Result<Vec<u8>> {
        let block_len = self.config.block_len;
        let message_len = self.message_len();
        let mut out = vec![0u8; self.encoded_len(data.len())];

        let codec = &self.codec;
        if self.config.parallel {
            self.install(|| {
                out.par_chunks_mut(block_len)
                    .zip(data.par_chunks(message_len))
                    .try_for_each(|(codeword, message)| codec.encode_to_slice(message, codeword))
            })?;
        } else {
            out.chunks_mut(block_len)
                .zip(data.chunks(message_len))
                .try_for_each(|(codeword, message)| codec.encode_to_slice(message, codeword))?;
        }

        debug!(
            "Encoded {} bytes into {} blocks of up to {} bytes",
            data.len(),
            data.len().div_ceil(message_len),
            block_len
        );
        Ok(out)
    }

    /// Decode the output of [`BlockCodec::encode_blocks`], correcting each block
    ///
    /// When several blocks are uncorrectable, the error names one of them.
    pub fn decode_blocks(&self, data: &[u8]) -> Result<Vec<u8>> {
        let block_len = self.config.block_len;
        let message_len = self.message_len();
        let ecc_len = self.codec.ecc_len();

        let tail = data.len() % block_len;
        if tail != 0 && tail <= ecc_len {
            return Err(RsError::InvalidCodewordLength { len: tail, ecc_len });
        }

        let blocks = data.len().div_ceil(block_len);
        let mut out = vec![0u8; data.len() - blocks * ecc_len];

        let codec = &self.codec;
        let decode_block = |block: usize, (message, codeword): (&mut [u8], &[u8])| {
            codec
                .decode(codeword, &[])
                .map(|decoded| message.copy_from_slice(&decoded))
                .map_err(|e| RsError::BlockDecode {
                    block,
                    source: Box::new(e),
                })
        };

        if self.config.parallel {
            self.install(|| {
                out.par_chunks_mut(message_len)
                    .zip(data.par_chunks(block_len))
                    .enumerate()
                    .try_for_each(|(block, pair)| decode_block(block, pair))
            })?;
        } else {
            out.chunks_mut(message_len)
                .zip(data.chunks(block_len))
                .enumerate()
                .try_for_each(|(block, pair)| decode_block(block, pair))?;
        }

        Ok(out)
    }

    fn install<R, F>(&self, op: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}

impl ReedSolomon {
    /// Encode `data` in codeword blocks of `block_len` bytes (sequential)
    pub fn encode_blocks(&self, data: &[u8], block_len: usize) -> Result<Vec<u8>> {
        BlockCodec::new(self.clone(), BlockConfig::new(block_len, false, 0))?.encode_blocks(data)
    }

    /// Decode codeword blocks of `block_len` bytes (sequential)
    pub fn decode_blocks(&self, data: &[u8], block_len: usize) -> Result<Vec<u8>> {
        BlockCodec::new(self.clone(), BlockConfig::new(block_len, false, 0))?.decode_blocks(data)
    }
}
