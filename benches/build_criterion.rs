use bucket_policy_core::{Profile, build, compose, parse, to_canonical_json};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use strum::IntoEnumIterator;

fn benchmark_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    group.sample_size(40);

    for profile in Profile::iter() {
        group.bench_with_input(BenchmarkId::from_parameter(profile), &profile, |b, p| {
            b.iter(|| {
                let bytes = build(black_box(p.as_ref()), black_box("benchmark-bucket"))
                    .expect("benchmark inputs are valid");
                black_box(bytes.len());
            });
        });
    }

    group.finish();
}

fn benchmark_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("round_trip");
    group.sample_size(40);

    for profile in Profile::iter() {
        let doc = compose(profile, "benchmark-bucket").expect("benchmark inputs are valid");
        let bytes = to_canonical_json(&doc).expect("benchmark documents serialize");
        group.bench_with_input(BenchmarkId::from_parameter(profile), &bytes, |b, bytes| {
            b.iter(|| {
                let reparsed = parse(black_box(bytes)).expect("canonical output parses");
                black_box(to_canonical_json(&reparsed).expect("reparsed documents serialize"));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_build, benchmark_round_trip);
criterion_main!(benches);
