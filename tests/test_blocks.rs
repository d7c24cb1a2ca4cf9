//! Tests for block coding of buffers longer than one codeword

use ffrs::{BlockCodec, BlockConfig, ReedSolomon, RsError};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};

fn random_data(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.random()).collect()
}

fn block_codec(ecc_len: usize, block_len: usize, parallel: bool, threads: usize) -> BlockCodec {
    let codec = ReedSolomon::with_ecc_len(ecc_len).unwrap();
    BlockCodec::new(codec, BlockConfig::new(block_len, parallel, threads)).unwrap()
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn test_blocks_are_independent_codewords() {
    let blocks = block_codec(8, 40, false, 0);
    let data = random_data(1, 100);
    let encoded = blocks.encode_blocks(&data).unwrap();

    // 32 + 32 + 32 + 4 message bytes
    assert_eq!(encoded.len(), 3 * 40 + 12);
    for (codeword, message) in encoded.chunks(40).zip(data.chunks(32)) {
        assert_eq!(codeword, blocks.codec().encode(message).unwrap().as_slice());
    }
}

#[test]
fn test_empty_input() {
    let blocks = block_codec(4, 20, true, 0);
    assert!(blocks.encode_blocks(&[]).unwrap().is_empty());
    assert!(blocks.decode_blocks(&[]).unwrap().is_empty());
}

#[test]
fn test_truncated_tail_rejected() {
    let blocks = block_codec(4, 20, false, 0);
    let encoded = blocks.encode_blocks(&random_data(2, 30)).unwrap();

    // 20-byte block plus an 18-byte tail; cut the tail down to its parity
    let truncated = &encoded[..20 + 4];
    assert!(matches!(
        blocks.decode_blocks(truncated),
        Err(RsError::InvalidCodewordLength { len: 4, ecc_len: 4 })
    ));
}

// ============================================================================
// Round Trips
// ============================================================================

#[test]
fn test_round_trip_sequential_and_parallel_agree() {
    let data = random_data(3, 5000);
    let sequential = block_codec(16, 255, false, 0);
    let parallel = block_codec(16, 255, true, 3);

    let a = sequential.encode_blocks(&data).unwrap();
    let b = parallel.encode_blocks(&data).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), sequential.encoded_len(data.len()));

    assert_eq!(sequential.decode_blocks(&b).unwrap(), data);
    assert_eq!(parallel.decode_blocks(&a).unwrap(), data);
}

#[test]
fn test_corrects_errors_in_every_block() {
    let _ = env_logger::builder().is_test(true).try_init();
    let blocks = block_codec(10, 64, true, 0);
    let data = random_data(4, 1000);
    let mut encoded = blocks.encode_blocks(&data).unwrap();

    let mut rng = StdRng::seed_from_u64(5);
    for block in encoded.chunks_mut(64) {
        for p in sample(&mut rng, block.len(), 5).into_vec() {
            block[p] ^= rng.random_range(1..=255u8);
        }
    }

    assert_eq!(blocks.decode_blocks(&encoded).unwrap(), data);
}

#[test]
fn test_uncorrectable_block_is_reported() {
    let blocks = block_codec(10, 21, true, 2);
    let data = b"Hello WorldHello WorldHello World".to_vec();
    let mut encoded = blocks.encode_blocks(&data).unwrap();

    for p in [0, 3, 7, 12, 17, 20] {
        encoded[21 + p] ^= 0xFF;
    }

    match blocks.decode_blocks(&encoded) {
        Err(RsError::BlockDecode { block, source }) => {
            assert_eq!(block, 1);
            assert!(matches!(*source, RsError::Uncorrectable(_)));
        }
        other => panic!("expected block failure, got {other:?}"),
    }
}

#[test]
fn test_codec_convenience_methods() {
    let rs = ReedSolomon::with_ecc_len(6).unwrap();
    let data = random_data(6, 300);

    let encoded = rs.encode_blocks(&data, 50).unwrap();
    assert_eq!(encoded.len(), 300 + 7 * 6);
    assert_eq!(rs.decode_blocks(&encoded, 50).unwrap(), data);

    assert!(matches!(
        rs.encode_blocks(&data, 6),
        Err(RsError::InvalidBlockLength { block_len: 6, ecc_len: 6 })
    ));
}

#[test]
fn test_block_error_keeps_source() {
    use std::error::Error;

    let err = RsError::BlockDecode {
        block: 3,
        source: Box::new(RsError::Uncorrectable("too many errors".to_string())),
    };
    assert_eq!(
        err.to_string(),
        "Block 3 failed to decode: Uncorrectable codeword: too many errors"
    );
    assert_eq!(
        err.source().map(|s| s.to_string()),
        Some("Uncorrectable codeword: too many errors".to_string())
    );
}
