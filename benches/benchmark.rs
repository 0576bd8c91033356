use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

use avl_containers::{AvlTreeMap, AvlTreeMultiset, AvlTreeSet};

const N: usize = 100_000;

pub fn benchmarks(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let values: Vec<i32> = (1..=N).map(|_| rng.gen()).collect();

    c.bench_function("map_insert", |b| {
        let mut map = AvlTreeMap::new();
        b.iter(|| {
            for value in &values {
                map.insert(*value, *value);
            }
        })
    });

    let mut map = AvlTreeMap::new();
    for value in &values {
        map.insert(*value, *value);
    }

    c.bench_function("map_get", |b| {
        b.iter(|| {
            for value in &values {
                black_box(map.get(value));
            }
        })
    });

    c.bench_function("map_iter", |b| {
        b.iter(|| {
            for (k, v) in &map {
                black_box((k, v));
            }
        })
    });

    c.bench_function("map_cursor_walk", |b| {
        b.iter(|| {
            let mut cursor = map.cursor_first();
            while let Some(entry) = cursor.get() {
                black_box(entry);
                cursor.move_next();
            }
        })
    });

    c.bench_function("map_remove", |b| {
        b.iter_batched(
            || map.clone(),
            |mut map| {
                for value in &values {
                    map.remove(value);
                }
            },
            BatchSize::LargeInput,
        )
    });

    c.bench_function("set_insert_remove", |b| {
        b.iter(|| {
            let mut set = AvlTreeSet::new();
            for value in &values {
                set.insert(*value);
            }
            for value in &values {
                set.remove(value);
            }
        })
    });

    c.bench_function("multiset_insert_count", |b| {
        b.iter(|| {
            let mut multiset = AvlTreeMultiset::new();
            for value in &values {
                multiset.insert(*value % 1024);
            }
            for value in &values {
                black_box(multiset.count(&(*value % 1024)));
            }
        })
    });
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
