use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use rand::RngCore;

use s1l0::decode::{decode_bypass_payload, decode_fdbaq_payload};

const NUM_QUADS: usize = 5000;

fn bench_bypass(c: &mut Criterion) {
    // Any bit pattern is a valid bypass payload.
    let bytes_per_channel = (NUM_QUADS * 10).div_ceil(16) * 2;
    let mut data = vec![0u8; 4 * bytes_per_channel];
    rand::thread_rng().fill_bytes(&mut data);

    let mut group = c.benchmark_group("bypass");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("decode", |b| {
        b.iter(|| {
            let samples = decode_bypass_payload(&data, NUM_QUADS).unwrap();
            assert_eq!(samples.len(), 2 * NUM_QUADS);
        });
    });
    group.finish();
}

fn bench_fdbaq(c: &mut Criterion) {
    // An all-zero stream is a valid FDBAQ payload: every block selects BRC 0
    // and THIDX 0, and every sample is the two-bit +0 code. Each channel
    // needs at most 8 parameter bits per block plus two bits per sample.
    let blocks = NUM_QUADS.div_ceil(128);
    let bits_per_channel = 8 * blocks + 2 * NUM_QUADS + 16;
    let data = vec![0u8; 4 * (bits_per_channel.div_ceil(16) * 2)];

    let mut group = c.benchmark_group("fdbaq");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("decode_zeros", |b| {
        b.iter(|| {
            let samples = decode_fdbaq_payload(&data, NUM_QUADS).unwrap();
            assert_eq!(samples.len(), 2 * NUM_QUADS);
        });
    });
    group.finish();
}

criterion_group!(benches, bench_bypass, bench_fdbaq);
criterion_main!(benches);
