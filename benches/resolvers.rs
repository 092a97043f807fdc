use async_af::{resolve_all_settling, resolve_in_series, wrap, Array, Function, Value};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use futures::executor::block_on;
use std::future::IntoFuture;
use std::hint::black_box;

// every third slot pending, every seventh a hole
fn mixed(len: usize) -> Array {
    (0..len)
        .map(|i| {
            if i % 7 == 6 {
                None
            } else if i % 3 == 0 {
                Some(Value::promise(async move { Ok(Value::from(i)) }))
            } else {
                Some(Value::from(i))
            }
        })
        .collect()
}

fn bench_resolvers(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    for len in [16usize, 256, 4096] {
        group.bench_with_input(BenchmarkId::new("all_settling", len), &len, |b, &len| {
            b.iter(|| block_on(resolve_all_settling(black_box(mixed(len)))))
        });
        group.bench_with_input(BenchmarkId::new("in_series", len), &len, |b, &len| {
            b.iter(|| block_on(resolve_in_series(black_box(mixed(len)))))
        });
    }
    group.finish();
}

fn bench_chain(c: &mut Criterion) {
    let double = Function::new(|call| Ok(Value::from(call.arg(0).to_number() * 2.0)));
    let quarter = Function::new(|call| Ok(Value::from(call.arg(0).to_number() % 4.0 == 0.0)));

    c.bench_function("map_filter_join_256", |b| {
        b.iter(|| {
            let chain = wrap(mixed(256))
                .map_af(double.clone())
                .filter_af(quarter.clone())
                .join_af(None);
            block_on(chain.into_future())
        })
    });
    c.bench_function("series_map_256", |b| {
        b.iter(|| block_on(wrap(mixed(256)).series().map_af(double.clone()).into_future()))
    });
}

criterion_group!(benches, bench_resolvers, bench_chain);
criterion_main!(benches);
