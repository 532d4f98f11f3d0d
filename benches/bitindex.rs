use criterion::{criterion_group, criterion_main, Criterion};

use bitindex::{
    codec::{dump_index, load_index},
    domain::Domain,
    index::{Index, Query},
};
use helpers::index::TestIndex;

fn criterion_benchmark(c: &mut Criterion) {
    // Create the index
    const NUM_KEYS: u32 = 10_000;
    let data = TestIndex::new(1000, NUM_KEYS, 20., 100, Some(0));
    let index = &data.index;

    c.bench_function("domain add", |b| {
        b.iter(|| {
            let mut domain = Domain::new();
            for member in 0..10_000 {
                domain.add(member);
            }
            domain
        })
    });

    c.bench_function("index add", |b| {
        b.iter(|| {
            let mut index = Index::new();
            for record in data.records.iter().take(1000) {
                for &member in record.members.iter() {
                    index.add(record.key, member);
                }
            }
            index
        })
    });

    let query = Query {
        any: data.records[0].members.clone(),
        not_all: data.records[1].members.clone(),
        ..Default::default()
    };
    c.bench_function("query", |b| b.iter(|| index.query(&query).unwrap().items()));

    let mut blob = Vec::new();
    dump_index(&mut blob, index).unwrap();

    c.bench_function("dump", |b| {
        b.iter(|| {
            let mut buffer = Vec::with_capacity(blob.len());
            dump_index(&mut buffer, index).unwrap();
            buffer
        })
    });
    c.bench_function("load", |b| b.iter(|| load_index(blob.as_slice()).unwrap()));
}

criterion_group! {
    name = benches;
    config = Criterion::default().significance_level(0.1).sample_size(50);
    targets = criterion_benchmark
}
criterion_main!(benches);
