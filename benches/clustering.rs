use criterion::{black_box, criterion_group, criterion_main, Criterion};
use policy_clusters::cluster::Kmeans;
use policy_clusters::data::Generator;
use policy_clusters::frame::{Frame, AGE, SUM_ASSURED};
use policy_clusters::scale::scale_columns;

fn bench_generate(c: &mut Criterion) {
    let generator = Generator::default().with_seed(42);
    c.bench_function("generate_default_portfolio", |b| {
        b.iter(|| black_box(&generator).generate().unwrap())
    });
}

fn bench_kmeans(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans");

    let dataset = Generator::default().with_seed(42).generate().unwrap();
    let cleaned = dataset.drop_missing_age();
    let frame = Frame::from_dataset(&cleaned.dataset).unwrap();
    let (scaled, _) = scale_columns(&frame, &[AGE, SUM_ASSURED]).unwrap();
    let data = scaled.points(&[AGE, SUM_ASSURED]).unwrap();

    group.bench_function("fit_n490_d2_k5_r10", |b| {
        b.iter(|| {
            let model = Kmeans::new(5).with_restarts(10).with_seed(42);
            model.fit(black_box(&data)).unwrap();
        })
    });

    group.finish();
}

criterion_group!(benches, bench_generate, bench_kmeans);
criterion_main!(benches);
