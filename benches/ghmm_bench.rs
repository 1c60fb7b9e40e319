use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tops::ghmm::mocks::{mock_casino, mock_mixed};
use tops::params::GhmmParams;
use tops::random_seq::generate;

fn criterion_benchmark(c: &mut Criterion) {
    let casino = mock_casino(GhmmParams::default()).unwrap();
    let mut group = c.benchmark_group("casino");
    for len in [100, 1_000, 10_000].iter() {
        let xs = generate(*len, 6, 0);
        group.bench_with_input(BenchmarkId::new("viterbi", len), len, |b, _| {
            b.iter(|| casino.viterbi(black_box(&xs)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("forward", len), len, |b, _| {
            b.iter(|| casino.forward(black_box(&xs)).unwrap());
        });
    }
    group.finish();

    let mut group = c.benchmark_group("mixed cached vs uncached");
    let cached = mock_mixed(GhmmParams::default()).unwrap();
    let uncached = mock_mixed(GhmmParams::default().uncached()).unwrap();
    let xs = generate(2_000, 2, 1);
    group.bench_function("cached", |b| {
        b.iter(|| cached.forward(black_box(&xs)).unwrap());
    });
    group.bench_function("uncached", |b| {
        b.iter(|| uncached.forward(black_box(&xs)).unwrap());
    });
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
