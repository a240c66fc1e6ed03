use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use math_spgemm::{CsrMatrix, MultiplyConfig, ParallelConfig, generate, multiply};

fn bench_generate(c: &mut Criterion) {
    c.bench_function("generate_2000x2000_1pct", |b| {
        b.iter(|| {
            let m: CsrMatrix<f32> = generate(2000, 2000, 0.01, black_box(42)).unwrap();
            black_box(m);
        })
    });
}

fn bench_multiply_threads(c: &mut Criterion) {
    let a: CsrMatrix<f32> = generate(1000, 1000, 0.01, 1).unwrap();
    let mut bt: CsrMatrix<f32> = generate(1000, 1000, 0.01, 2).unwrap();
    bt.sort_rows(&ParallelConfig::default()).unwrap();

    let mut group = c.benchmark_group("multiply_1000_1pct");
    group.sample_size(20);
    for threads in [1, 2, 4, 8] {
        let config = MultiplyConfig {
            block_size: None,
            parallel: ParallelConfig::with_threads(threads),
        };
        group.bench_with_input(BenchmarkId::from_parameter(threads), &config, |b, config| {
            b.iter(|| black_box(multiply(&a, &bt, config).unwrap()))
        });
    }
    group.finish();
}

fn bench_block_size(c: &mut Criterion) {
    let a: CsrMatrix<f32> = generate(1000, 1000, 0.01, 3).unwrap();
    let bt: CsrMatrix<f32> = generate(1000, 1000, 0.01, 4).unwrap();

    let mut group = c.benchmark_group("multiply_block_size");
    group.sample_size(20);
    for block_size in [1, 10, 100, 1000] {
        let config = MultiplyConfig {
            block_size: Some(block_size),
            parallel: ParallelConfig::default(),
        };
        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &config,
            |b, config| b.iter(|| black_box(multiply(&a, &bt, config).unwrap())),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_generate, bench_multiply_threads, bench_block_size);
criterion_main!(benches);
