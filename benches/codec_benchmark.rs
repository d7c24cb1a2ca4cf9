use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ffrs::{gf256, BlockCodec, BlockConfig, ReedSolomon};
use std::hint::black_box;

fn test_data(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 131 + 7) as u8).collect()
}

/// Bulk scalar multiply against the per-byte table path
fn bench_mul8(c: &mut Criterion) {
    let gf = gf256();
    let mut group = c.benchmark_group("mul8");

    for size in [255usize, 4096, 65536] {
        let input = test_data(size);
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("mul8", size), &input, |b, input| {
            let mut buffer = input.clone();
            b.iter(|| gf.mul8(black_box(&mut buffer), black_box(0x8E)));
        });
        group.bench_with_input(BenchmarkId::new("mul_loop", size), &input, |b, input| {
            let mut buffer = input.clone();
            b.iter(|| {
                for x in buffer.iter_mut() {
                    *x = gf.mul(*x, black_box(0x8E));
                }
            });
        });
    }
    group.finish();
}

/// Single-codeword encode and decode at common parity lengths
fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codeword");

    for ecc_len in [10usize, 32, 64] {
        let rs = ReedSolomon::with_ecc_len(ecc_len).unwrap();
        let message = test_data(rs.max_message_len());
        let codeword = rs.encode(&message).unwrap();
        group.throughput(Throughput::Bytes(message.len() as u64));

        group.bench_with_input(BenchmarkId::new("encode", ecc_len), &message, |b, m| {
            b.iter(|| rs.encode(black_box(m)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("decode_clean", ecc_len), &codeword, |b, cw| {
            b.iter(|| rs.decode(black_box(cw), &[]).unwrap());
        });

        let mut corrupted = codeword.clone();
        for p in (0..ecc_len / 2).map(|i| i * 7 % corrupted.len()) {
            corrupted[p] ^= 0x5A;
        }
        group.bench_with_input(
            BenchmarkId::new("decode_max_errors", ecc_len),
            &corrupted,
            |b, cw| {
                b.iter(|| rs.decode(black_box(cw), &[]).unwrap());
            },
        );
    }
    group.finish();
}

/// Block coding, sequential against rayon
fn bench_blocks(c: &mut Criterion) {
    let data = test_data(1 << 20);
    let mut group = c.benchmark_group("blocks");
    group.throughput(Throughput::Bytes(data.len() as u64));

    for parallel in [false, true] {
        let codec = ReedSolomon::with_ecc_len(32).unwrap();
        let blocks = BlockCodec::new(codec, BlockConfig::new(255, parallel, 0)).unwrap();
        let encoded = blocks.encode_blocks(&data).unwrap();
        let label = if parallel { "parallel" } else { "sequential" };

        group.bench_function(BenchmarkId::new("encode", label), |b| {
            b.iter(|| blocks.encode_blocks(black_box(&data)).unwrap());
        });
        group.bench_function(BenchmarkId::new("decode", label), |b| {
            b.iter(|| blocks.decode_blocks(black_box(&encoded)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_mul8, bench_codec, bench_blocks);
criterion_main!(benches);
