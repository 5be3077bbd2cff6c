use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use kpick::madow_sample_with_u;
use std::hint::black_box;

fn bench_madow(c: &mut Criterion) {
    let mut group = c.benchmark_group("madow_sample");
    for &n in &[100usize, 1_000usize, 10_000usize] {
        let k = n / 10;
        // Uniform feasible marginals; the sampler cost is dominated by the
        // cumulative-sum walk, not the shape of p.
        let p = vec![k as f64 / n as f64; n];

        group.bench_with_input(BenchmarkId::new("uniform", n), &n, |b, &_n| {
            b.iter(|| {
                let s = madow_sample_with_u(black_box(&p), k, 0.37).unwrap();
                black_box(s);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_madow);
criterion_main!(benches);
