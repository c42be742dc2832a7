// Matching and elicitation benchmarks
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use finishcase::prelude::*;
use rand::prelude::*;
use serde_json::json;
use std::sync::Arc;

const MATERIALS: [&str; 4] = ["steel", "brass", "aluminium", "titanium"];

fn config() -> FeatureWeightConfig {
    FeatureWeightConfig::new(vec![
        FeatureGroup::new(
            "geometry",
            vec![
                FeatureWeight::numeric("length", "Length", 0.15),
                FeatureWeight::numeric("diameter", "Diameter", 0.15),
            ],
        ),
        FeatureGroup::new(
            "material",
            vec![
                FeatureWeight::numeric("hardness", "Hardness", 0.2),
                FeatureWeight::categorical("material_type", "Material type", 0.1),
            ],
        ),
        FeatureGroup::new(
            "surface",
            vec![
                FeatureWeight::numeric("surface_roughness", "Surface roughness", 0.3),
                FeatureWeight::boolean("deburring", "Deburring", 0.1),
            ],
        ),
    ])
}

fn generate_random_case(rng: &mut impl Rng, id: usize) -> CaseRecord {
    CaseRecord::from_features(
        format!("case-{}", id),
        json!({
            "length": rng.random_range(5.0..500.0),
            "diameter": rng.random_range(1.0..120.0),
            "hardness": rng.random_range(20.0..65.0),
            "material_type": MATERIALS[rng.random_range(0..MATERIALS.len())],
            "surface_roughness": rng.random_range(0.1..12.5),
            "deburring": rng.random_bool(0.5),
        }),
    )
}

fn context(size: usize) -> Arc<MatchContext> {
    let mut rng = StdRng::seed_from_u64(42);
    let cases = (0..size).map(|i| generate_random_case(&mut rng, i)).collect();
    Arc::new(MatchContext::new(config(), cases))
}

fn benchmark_find_similar(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_similar_cases");
    let mut rng = StdRng::seed_from_u64(7);
    let target = generate_random_case(&mut rng, usize::MAX);

    for size in [1_000, 10_000, 50_000].iter() {
        let ctx = context(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let ranked = find_similar_cases(
                    black_box(&ctx),
                    black_box(&target),
                    &MatchOptions::default(),
                );
                black_box(ranked)
            });
        });
    }

    group.finish();
}

fn benchmark_batch_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_match");
    group.sample_size(20);
    let ctx = context(10_000);
    let mut rng = StdRng::seed_from_u64(11);
    let targets: Vec<CaseRecord> = (0..32)
        .map(|i| generate_random_case(&mut rng, 1_000_000 + i))
        .collect();

    for workers in [1, 4, 8].iter() {
        let options = BatchOptions {
            workers: Some(*workers),
            ..BatchOptions::default()
        };
        group.bench_with_input(BenchmarkId::new("workers", workers), workers, |b, _| {
            b.iter(|| {
                let results = batch_match(Arc::clone(&ctx), targets.clone(), &options);
                black_box(results)
            });
        });
    }

    group.finish();
}

fn benchmark_ahp(c: &mut Criterion) {
    let mut group = c.benchmark_group("ahp");
    let engine = AhpEngine::default();
    let mut rng = StdRng::seed_from_u64(3);
    let scale = [1.0, 2.0, 3.0, 5.0, 7.0, 9.0];

    for n in [4usize, 9, 15].iter() {
        let mut upper = vec![vec![1.0; *n]; *n];
        for (i, row) in upper.iter_mut().enumerate() {
            for value in row.iter_mut().skip(i + 1) {
                let v = scale[rng.random_range(0..scale.len())];
                *value = if rng.random_bool(0.5) { v } else { 1.0 / v };
            }
        }
        let matrix = JudgmentMatrix::from_upper_triangle(&upper).expect("valid matrix");

        for method in [WeightMethod::GeometricMean, WeightMethod::Eigenvector] {
            group.bench_with_input(BenchmarkId::new(format!("{:?}", method), n), n, |b, _| {
                b.iter(|| black_box(engine.weigh(black_box(&matrix), method)));
            });
        }
    }

    group.finish();
}

criterion_group!(benches, benchmark_find_similar, benchmark_batch_match, benchmark_ahp);
criterion_main!(benches);
