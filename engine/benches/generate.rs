use core::hint::black_box;
use std::io::sink;

use bid_fixtures_engine::{
    feedback::sample_ratings,
    population::{PopulationGenerator, PopulationParams},
    rng::FixtureRng,
    script::{write_fixtures, CommandTemplate},
};
use criterion::{criterion_group, criterion_main, Criterion};

fn population(c: &mut Criterion) {
    let params = PopulationParams::default();
    let generator =
        PopulationGenerator::new(params.time_mean, params.time_std_dev)
            .unwrap();
    let mut rng = FixtureRng::new(0xABC);

    let mut g = c.benchmark_group("population");
    g.throughput(criterion::Throughput::Elements(
        (params.buyers + params.sellers) as u64,
    ));

    g.bench_function("generate", |b| {
        b.iter(|| {
            black_box(generator.generate(
                params.buyers,
                params.sellers,
                &mut rng,
            ))
        });
    });

    g.finish();
}

fn ratings(c: &mut Criterion) {
    let params = PopulationParams::default();
    let mut rng = FixtureRng::new(0xFEED);
    let population = PopulationGenerator::new(4.0, 1.0)
        .unwrap()
        .generate(params.buyers, params.sellers, &mut rng);

    // One rating per buyer
    let mut g = c.benchmark_group("ratings");
    g.throughput(criterion::Throughput::Elements(params.buyers as u64));

    g.bench_function("sample", |b| {
        b.iter(|| black_box(sample_ratings(&population, &mut rng)));
    });
    g.finish();
}

fn scripts(c: &mut Criterion) {
    let params = PopulationParams::default();
    let population = PopulationGenerator::new(4.0, 1.0)
        .unwrap()
        .generate(params.buyers, params.sellers, &mut FixtureRng::new(1));
    let template = CommandTemplate::default();

    c.bench_function("write_fixtures", |b| {
        b.iter(|| {
            write_fixtures(&population, &template, &mut sink(), &mut sink())
                .unwrap()
        });
    });
}

criterion_group!(generate, population, ratings, scripts);

criterion_main!(generate);
