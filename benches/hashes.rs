use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use murmur3_token::{Murmur3Partitioner, Token, TokenRing};
use wyhash_final4::{generics::WyHashVariant, WyHash64};

fn criterion_benchmark(c: &mut Criterion) {
    const SIZE: u64 = 256 * 1024;
    let msg = vec![0xABu8; SIZE as usize];

    c.benchmark_group("Murmur3")
        .throughput(Throughput::Bytes(SIZE))
        .bench_function("hash64", |b| {
            b.iter(|| {
                black_box(murmur3_token::hash64(black_box(&msg)));
            })
        })
        .bench_function("hash-128", |b| {
            b.iter(|| {
                black_box(murmur3_token::hash_128(black_box(&msg)));
            })
        })
        .bench_function("cassandra-hash64", |b| {
            b.iter(|| {
                black_box(murmur3_token::cassandra::hash64(black_box(&msg)));
            })
        })
        .bench_function("murmur3-crate", |b| {
            b.iter(|| {
                black_box(murmur3::murmur3_x64_128(&mut Cursor::new(black_box(&msg)), 0).unwrap());
            })
        });

    c.benchmark_group("Others")
        .throughput(Throughput::Bytes(SIZE))
        .bench_function("wyhash-final4", |b| {
            b.iter(|| {
                black_box(WyHash64::with_seed(0).hash(black_box(&msg)));
            })
        })
        .bench_function("komihash", |b| {
            b.iter(|| {
                black_box(komihash::komihash(black_box(&msg), 0));
            })
        });

    // Partition keys are short, so per-call overhead dominates there.
    let mut group = c.benchmark_group("PartitionKey");
    for len in [4usize, 15, 16, 17, 36] {
        let key = (0..len as u8).collect::<Vec<_>>();
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::new("create_token", len), &key, |b, key| {
            b.iter(|| black_box(Murmur3Partitioner.create_token(black_box(key))))
        });
    }
    group.finish();

    let ring = TokenRing::new((0..256u64).map(|i| (Token::from_bits(i * (u64::MAX / 256)), i))).unwrap();
    c.bench_function("TokenRing/replicas", |b| {
        b.iter(|| black_box(ring.replicas(black_box(b"user:42"), 3).sum::<u64>()))
    });
}

criterion_group! {
    name=benches;
    config=Criterion::default();
    targets=criterion_benchmark
}
criterion_main!(benches);
