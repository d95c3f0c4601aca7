use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use krinsky::{
    run_monte_carlo, MonteCarloConfig, StochasticEnvironment, TrialConfig, TrialRunner,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::hint::black_box;

fn bench_trial(c: &mut Criterion) {
    let env = StochasticEnvironment::reference().unwrap();
    let mut group = c.benchmark_group("trial");

    for &(batch, cutoff) in &[(1_000u64, 100u64), (10_000, 1_000)] {
        let runner = TrialRunner::new(&env, TrialConfig::new(batch, cutoff).unwrap()).unwrap();
        group.bench_with_input(BenchmarkId::new("run", batch), &batch, |b, _| {
            let mut rng = StdRng::seed_from_u64(7);
            b.iter(|| black_box(runner.run(&mut rng)))
        });
    }
    group.finish();
}

fn bench_monte_carlo(c: &mut Criterion) {
    let env = StochasticEnvironment::reference().unwrap();
    let cfg = MonteCarloConfig {
        trials: 10,
        trial: TrialConfig::default(),
        seed: 1,
    };
    c.bench_function("monte_carlo/10x10000", |b| {
        b.iter(|| black_box(run_monte_carlo(&env, cfg).unwrap()))
    });
}

criterion_group!(benches, bench_trial, bench_monte_carlo);
criterion_main!(benches);
