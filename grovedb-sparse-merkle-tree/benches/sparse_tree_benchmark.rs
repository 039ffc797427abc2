#[macro_use]
extern crate criterion;

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use grovedb_sparse_merkle_tree::SparseMerkleTree;

fn make_leaves(count: u32) -> Vec<Vec<u8>> {
    (0..count).map(|i| i.to_le_bytes().to_vec()).collect()
}

fn build(leaves: &[Vec<u8>], total_size: u64) -> SparseMerkleTree<blake3::Hasher> {
    let mut tree = SparseMerkleTree::new(blake3::Hasher::new());
    tree.generate(leaves, total_size).expect("generate");
    tree
}

fn bench(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("SMT sparse build");
        let leaves = make_leaves(16);
        for log_size in [20u32, 40, 63] {
            group.bench_with_input(
                BenchmarkId::new("log2 size", log_size),
                &log_size,
                |b, &log_size| {
                    b.iter(|| build(black_box(&leaves), 1 << log_size));
                },
            );
        }
    }

    {
        let mut group = c.benchmark_group("SMT dense build");
        for count in [1_024u32, 16_384, 131_072] {
            let leaves = make_leaves(count);
            group.bench_with_input(BenchmarkId::new("leaves", count), &leaves, |b, leaves| {
                b.iter(|| build(black_box(leaves), count as u64));
            });
        }
    }

    c.bench_function("SMT gen proof", |b| {
        let tree = build(&make_leaves(100_000), 1 << 20);
        let mut index = 0u64;
        b.iter(|| {
            // Alternate between real and empty positions.
            index = (index + 7_919) % (1 << 20);
            tree.prove(black_box(index)).expect("prove")
        });
    });

    c.bench_function("SMT verify", |b| {
        let mut tree = build(&make_leaves(100_000), 1 << 20);
        let proofs: Vec<_> = (0..1_000u64)
            .map(|i| tree.prove(i * 1_048).expect("prove"))
            .collect();
        let mut i = 0;
        b.iter(|| {
            i = (i + 1) % proofs.len();
            assert!(tree.verify_proof(&proofs[i]).expect("verify"));
        });
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default().sample_size(20);
    targets = bench
);
criterion_main!(benches);
