use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rank_tree::{IndexedSeq, RankTree};
use std::collections::{BTreeMap, VecDeque};
use std::hint::black_box;

const N: usize = 10_000;

// ─── Helper functions to generate index sequences ───────────────────────────

/// Insertion indices that are always valid for a container growing from empty.
fn random_indices(n: usize) -> Vec<usize> {
    // Use a simple LCG for deterministic pseudo-random sequence
    let mut indices = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for len in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        indices.push((x >> 33) as usize % (len + 1));
    }
    indices
}

// ─── Sequence Benchmarks ────────────────────────────────────────────────────

fn bench_seq_push_back(c: &mut Criterion) {
    let mut group = c.benchmark_group("seq_push_back");

    group.bench_function(BenchmarkId::new("IndexedSeq", N), |b| {
        b.iter(|| {
            let mut seq = IndexedSeq::new();
            for i in 0..N {
                seq.push_back(i);
            }
            seq
        });
    });

    group.bench_function(BenchmarkId::new("VecDeque", N), |b| {
        b.iter(|| {
            let mut seq = VecDeque::new();
            for i in 0..N {
                seq.push_back(i);
            }
            seq
        });
    });

    group.finish();
}

fn bench_seq_push_front(c: &mut Criterion) {
    let mut group = c.benchmark_group("seq_push_front");

    group.bench_function(BenchmarkId::new("IndexedSeq", N), |b| {
        b.iter(|| {
            let mut seq = IndexedSeq::new();
            for i in 0..N {
                seq.push_front(i);
            }
            seq
        });
    });

    group.bench_function(BenchmarkId::new("VecDeque", N), |b| {
        b.iter(|| {
            let mut seq = VecDeque::new();
            for i in 0..N {
                seq.push_front(i);
            }
            seq
        });
    });

    group.finish();
}

fn bench_seq_insert_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("seq_insert_random");
    let indices = random_indices(N);

    group.bench_function(BenchmarkId::new("IndexedSeq", N), |b| {
        b.iter(|| {
            let mut seq = IndexedSeq::new();
            for (i, &index) in indices.iter().enumerate() {
                seq.insert(index, i);
            }
            seq
        });
    });

    group.bench_function(BenchmarkId::new("Vec", N), |b| {
        b.iter(|| {
            let mut seq = Vec::new();
            for (i, &index) in indices.iter().enumerate() {
                seq.insert(index, i);
            }
            seq
        });
    });

    group.bench_function(BenchmarkId::new("VecDeque", N), |b| {
        b.iter(|| {
            let mut seq = VecDeque::new();
            for (i, &index) in indices.iter().enumerate() {
                seq.insert(index, i);
            }
            seq
        });
    });

    group.finish();
}

fn bench_seq_get_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("seq_get_random");
    let indices = random_indices(N);
    let seq: IndexedSeq<usize> = (0..N).collect();
    let vec: Vec<usize> = (0..N).collect();

    group.bench_function(BenchmarkId::new("IndexedSeq", N), |b| {
        b.iter(|| {
            let mut sum = 0;
            for &index in &indices {
                sum += seq[black_box(index)];
            }
            sum
        });
    });

    group.bench_function(BenchmarkId::new("Vec", N), |b| {
        b.iter(|| {
            let mut sum = 0;
            for &index in &indices {
                sum += vec[black_box(index)];
            }
            sum
        });
    });

    group.finish();
}

fn bench_seq_remove_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("seq_remove_random");
    let indices = random_indices(N);

    group.bench_function(BenchmarkId::new("IndexedSeq", N), |b| {
        b.iter_batched(
            || (0..N).collect::<IndexedSeq<usize>>(),
            |mut seq| {
                for &index in indices.iter().rev() {
                    seq.remove(index);
                }
                seq
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.bench_function(BenchmarkId::new("Vec", N), |b| {
        b.iter_batched(
            || (0..N).collect::<Vec<usize>>(),
            |mut seq| {
                for &index in indices.iter().rev() {
                    seq.remove(index);
                }
                seq
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

fn bench_seq_iter(c: &mut Criterion) {
    let mut group = c.benchmark_group("seq_iter");
    let seq: IndexedSeq<usize> = (0..N).collect();
    let deque: VecDeque<usize> = (0..N).collect();

    group.bench_function(BenchmarkId::new("IndexedSeq", N), |b| {
        b.iter(|| seq.iter().sum::<usize>());
    });

    group.bench_function(BenchmarkId::new("VecDeque", N), |b| {
        b.iter(|| deque.iter().sum::<usize>());
    });

    group.finish();
}

// ─── Tree Benchmarks ────────────────────────────────────────────────────────

fn bench_tree_insert_ordered(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_insert_ordered");

    group.bench_function(BenchmarkId::new("RankTree", N), |b| {
        b.iter(|| {
            let mut tree = RankTree::new();
            for i in 0..N as i64 {
                tree.insert(i, i);
            }
            tree
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut map = BTreeMap::new();
            for i in 0..N as i64 {
                map.insert(i, i);
            }
            map
        });
    });

    group.finish();
}

fn bench_tree_shift(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_shift");
    let indices = random_indices(N);

    group.bench_function(BenchmarkId::new("RankTree", N), |b| {
        b.iter_batched(
            || (0..N as i64).map(|i| (i * 2, i)).collect::<RankTree<i64, i64>>(),
            |mut tree| {
                for &index in &indices {
                    tree.shift_from(index as i64 * 2 + 1, 1);
                }
                tree
            },
            criterion::BatchSize::LargeInput,
        );
    });

    // Rebuilding is the only way to renumber a BTreeMap's keys.
    group.bench_function(BenchmarkId::new("BTreeMap", N / 100), |b| {
        b.iter_batched(
            || (0..N as i64).map(|i| (i * 2, i)).collect::<BTreeMap<i64, i64>>(),
            |mut map| {
                for &index in indices.iter().take(N / 100) {
                    let boundary = index as i64 * 2 + 1;
                    let moved = map.split_off(&boundary);
                    map.extend(moved.into_iter().map(|(k, v)| (k + 1, v)));
                }
                map
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

// ─── Criterion Groups ───────────────────────────────────────────────────────

criterion_group!(
    seq_benches,
    bench_seq_push_back,
    bench_seq_push_front,
    bench_seq_insert_random,
    bench_seq_get_random,
    bench_seq_remove_random,
    bench_seq_iter,
);

criterion_group!(tree_benches, bench_tree_insert_ordered, bench_tree_shift,);

criterion_main!(seq_benches, tree_benches);
